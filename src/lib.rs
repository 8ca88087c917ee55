//! Token launchpad orchestration engine.
//!
//! Lets a hosting UI provision a new fungible token on Solana (mint,
//! Token-2022 on-chain metadata and initial supply) and optionally register
//! a CPMM liquidity pool for it. The heart of the crate is the transaction
//! orchestrator: instruction batches are built per stage, signed in one
//! wallet interaction against a shared blockhash, then submitted and
//! confirmed strictly in order, aborting at the first failure with a full
//! per-stage trace.
//!
//! The UI, wallet popup and storage provider are external collaborators
//! behind the traits in [`services`]; domain logic lives in [`domain`].

pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;
