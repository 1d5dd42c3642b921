//! Command-line flags of `mic`.

use std::path::PathBuf;

use clap::Parser;

/// Query the register and lane layout of AMD matrix-multiply instructions.
///
/// Pick an architecture and instruction, then one action: list the
/// instructions, describe one, find the register of one element
/// (--get-register), find the elements of one register and lane
/// (--matrix-entry), or lay out a whole matrix (--register-layout,
/// --matrix-layout).
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "mic", disable_version_flag = true)]
pub struct Args {
    /// Print the version of this tool.
    #[arg(short = 'v', long = "version")]
    pub print_version: bool,

    /// Architecture or chip to query (cdna1, cdna2, cdna3, rdna3, rdna4, or
    /// an alias such as gfx90a or mi300x).
    #[arg(short = 'a', long = "architecture")]
    pub architecture: Option<String>,

    /// Instruction mnemonic to query.
    #[arg(short = 'i', long = "instruction")]
    pub instruction: Option<String>,

    /// Print the instructions available on the architecture.
    #[arg(short = 'L', long = "list-instructions", visible_alias = "list_instructions")]
    pub list_instructions: bool,

    /// Print detailed information about the instruction.
    #[arg(short = 'd', long = "detail-instruction", visible_alias = "detail_instruction")]
    pub detail_instruction: bool,

    /// With --list-instructions or --detail-instruction, print JSON.
    #[arg(long)]
    pub json: bool,

    /// Query the A matrix.
    #[arg(short = 'A', long = "A-matrix", visible_alias = "A_matrix")]
    pub a_matrix: bool,

    /// Query the B matrix.
    #[arg(short = 'B', long = "B-matrix", visible_alias = "B_matrix")]
    pub b_matrix: bool,

    /// Query the C matrix.
    #[arg(short = 'C', long = "C-matrix", visible_alias = "C_matrix")]
    pub c_matrix: bool,

    /// Query the D matrix.
    #[arg(short = 'D', long = "D-matrix", visible_alias = "D_matrix")]
    pub d_matrix: bool,

    /// Query the sparse compression-index (K) matrix.
    #[arg(long = "K-matrix", visible_alias = "K_matrix")]
    pub k_matrix: bool,

    /// CBSZ control field (A matrix).
    #[arg(long, value_name = "#", default_value_t = 0)]
    pub cbsz: u32,

    /// ABID broadcast field (A matrix, or K on sparse CDNA3).
    #[arg(long, value_name = "#", default_value_t = 0)]
    pub abid: u32,

    /// BLGP lane swizzle field (B matrix).
    #[arg(long, value_name = "#", default_value_t = 0)]
    pub blgp: u32,

    /// OPSEL field (C/D on RDNA3, K on sparse RDNA4).
    #[arg(long, value_name = "#", default_value_t = 0)]
    pub opsel: u32,

    /// NEG field (A, B or C matrices).
    #[arg(long, value_name = "#", default_value_t = 0)]
    pub neg: u32,

    /// NEG_HI field (A, B or C matrices).
    #[arg(long = "neg_hi", visible_alias = "neg-hi", value_name = "#", default_value_t = 0)]
    pub neg_hi: u32,

    /// Wavefront width; defaults to the architecture's native width.
    #[arg(short = 'w', long = "wavefront", value_name = "32/64")]
    pub wavefront: Option<u32>,

    /// Print the register and lane of one matrix element.
    #[arg(short = 'g', long = "get-register", visible_alias = "get_register")]
    pub get_register: bool,

    /// Row coordinate for --get-register.
    #[arg(short = 'I', long = "I-coordinate", visible_alias = "I_coordinate", value_name = "#", default_value_t = 0)]
    pub i_coordinate: u32,

    /// Column coordinate for --get-register.
    #[arg(short = 'J', long = "J-coordinate", visible_alias = "J_coordinate", value_name = "#", default_value_t = 0)]
    pub j_coordinate: u32,

    /// Reduction coordinate for --get-register.
    #[arg(short = 'K', long = "K-coordinate", visible_alias = "K_coordinate", value_name = "#", default_value_t = 0)]
    pub k_coordinate: u32,

    /// Block for --get-register.
    #[arg(short = 'b', long = "block", value_name = "#", default_value_t = 0)]
    pub block: u32,

    /// Print the matrix elements held by one register and lane.
    #[arg(short = 'm', long = "matrix-entry", visible_alias = "matrix_entry")]
    pub matrix_entry: bool,

    /// Register for --matrix-entry.
    #[arg(short = 'r', long = "register", value_name = "#", default_value_t = 0)]
    pub register: u32,

    /// Lane for --matrix-entry.
    #[arg(short = 'l', long = "lane", value_name = "#", default_value_t = 0)]
    pub lane: u32,

    /// For the D matrix, also print the inputs that produce each value.
    #[arg(short = 'o', long = "output-calculation", visible_alias = "output_calculation")]
    pub output_calculation: bool,

    /// Print the register and lanes of every matrix element.
    #[arg(short = 'R', long = "register-layout", visible_alias = "register_layout")]
    pub register_layout: bool,

    /// Print the matrix elements held by every register and lane.
    #[arg(short = 'M', long = "matrix-layout", visible_alias = "matrix_layout")]
    pub matrix_layout: bool,

    /// Print layouts as CSV.
    #[arg(short = 'c', long)]
    pub csv: bool,

    /// Print layouts as a Markdown table.
    #[arg(long)]
    pub markdown: bool,

    /// Print layouts as an AsciiDoc table.
    #[arg(long)]
    pub asciidoc: bool,

    /// Swap rows and columns of layouts.
    #[arg(long)]
    pub transpose: bool,

    /// Log calculator internals to stderr.
    #[arg(long)]
    pub verbose: bool,

    /// JSON file with logging settings.
    #[arg(long, value_name = "FILE")]
    pub log_config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn underscore_spellings_are_accepted() {
        let args = Args::try_parse_from(["mic", "-a", "cdna2", "--list_instructions"]).unwrap();
        assert!(args.list_instructions);
        let args = Args::try_parse_from(["mic", "--neg-hi", "3", "--A_matrix"]).unwrap();
        assert_eq!(args.neg_hi, 3);
        assert!(args.a_matrix);
    }

    #[test]
    fn coordinates_default_to_zero() {
        let args = Args::try_parse_from(["mic", "-g", "-I", "4"]).unwrap();
        assert_eq!((args.i_coordinate, args.j_coordinate, args.k_coordinate, args.block), (4, 0, 0, 0));
        assert_eq!(args.wavefront, None);
    }
}
