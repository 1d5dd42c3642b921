//! `mic`: AMD matrix instruction calculator.
//!
//! Prints the register and lane layout of MFMA, SMFMAC, WMMA and SWMMAC
//! instructions.
//!
//! **Usage:**
//! ```text
//! mic -a cdna3 -i v_mfma_f32_32x32x8_f16 --register-layout -A
//! mic -a rdna3 -i v_wmma_f32_16x16x16_f16 -w 64 --matrix-entry -D -r 2 -l 17
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use mic_cli::{logging, run, Args, TracingConfig};

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.log_config {
        Some(path) => TracingConfig::from_json_file(path)?,
        None => TracingConfig::from_env(),
    };
    logging::init(&config.verbose(args.verbose))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out)?;
    out.flush()?;
    Ok(())
}
