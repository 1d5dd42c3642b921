//! The `mic` command-line front end.
//!
//! `mic` resolves an architecture and instruction from `mic-catalog`, checks
//! the requested query against its flags, runs it through `mic-calc` and
//! prints the result. Layout tables are rendered as grids, CSV, Markdown or
//! AsciiDoc.
//!
//! ```
//! use clap::Parser;
//! use mic_cli::{run, Args};
//!
//! let args = Args::try_parse_from([
//!     "mic", "-a", "cdna3", "-i", "v_mfma_f32_16x16x4_f32", "-g", "-D", "-I", "1", "-J", "1",
//! ])?;
//! let mut out = Vec::new();
//! run(&args, &mut out)?;
//! let text = String::from_utf8(out)?;
//! assert!(text.starts_with("Architecture: CDNA3\nInstruction: V_MFMA_F32_16X16X4_F32\n"));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod args;
pub mod logging;
pub mod render;
pub mod run;

pub use args::Args;
pub use logging::TracingConfig;
pub use render::{render, TableFormat};
pub use run::{instruction_list, run, VERSION_BANNER};
