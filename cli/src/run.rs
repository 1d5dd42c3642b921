//! Flag validation and query dispatch.

use std::io::Write;

use anyhow::{bail, Context};
use mic_calc::{
    get_register, matrix_entry, matrix_layout, register_layout, Calculator, InstructionInfo,
    LayoutTable, LogicalCoordinate, MatrixRole, ModifierSet,
};
use mic_catalog::serializer::json::{descriptor_to_json, to_json};
use mic_catalog::{Architecture, Catalog, CatalogError, InstructionDescriptor};
use tracing::debug;

use crate::args::Args;
use crate::render::{render, TableFormat};

/// Version banner printed by `--version`.
pub const VERSION_BANNER: &str = concat!(
    "AMD Matrix Instruction Calculator Version ",
    env!("CARGO_PKG_VERSION")
);

/// The query chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    GetRegister,
    MatrixEntry,
    RegisterLayout,
    MatrixLayout,
}

impl Action {
    fn flag(self) -> &'static str {
        match self {
            Action::GetRegister => "--get-register",
            Action::MatrixEntry => "--matrix-entry",
            Action::RegisterLayout => "--register-layout",
            Action::MatrixLayout => "--matrix-layout",
        }
    }
}

/// Runs the command described by `args`, writing results to `out`.
///
/// # Errors
///
/// Fails on missing or conflicting flags, unknown architectures or
/// instructions, modifier values the instruction rejects, out-of-range
/// coordinates, registers or lanes, and write failures.
pub fn run(args: &Args, out: &mut dyn Write) -> anyhow::Result<()> {
    if args.print_version {
        writeln!(out, "{VERSION_BANNER}")?;
        return Ok(());
    }

    let arch = architecture(args)?;
    let catalog = Catalog::full();

    if args.list_instructions {
        if args.json {
            let json = serde_json::to_string_pretty(&to_json(catalog, Some(arch)))
                .context("serializing the instruction list")?;
            writeln!(out, "{json}")?;
        } else {
            write!(out, "{}", instruction_list(catalog, arch))?;
        }
        return Ok(());
    }

    let desc = instruction(args, catalog, arch)?;
    let wave = args
        .wavefront
        .filter(|&width| width != 0)
        .unwrap_or_else(|| arch.native_wave_width());
    debug!(arch = %arch, instruction = desc.mnemonic, wave, "resolved query target");
    let calc = Calculator::new(desc, wave)?;

    if args.detail_instruction {
        if args.json {
            let json = serde_json::to_string_pretty(&descriptor_to_json(desc))
                .context("serializing the instruction")?;
            writeln!(out, "{json}")?;
        } else {
            write!(out, "{}", InstructionInfo::build(desc)?)?;
        }
        return Ok(());
    }

    let action = action(args)?;
    let role = role(args, action)?;
    if args.output_calculation && role != MatrixRole::D {
        bail!("The option '--output-calculation' is only possible for the D matrix.");
    }
    let format = table_format(args)?;
    let mods = ModifierSet {
        cbsz: args.cbsz,
        abid: args.abid,
        blgp: args.blgp,
        opsel: args.opsel,
        neg: args.neg,
        neg_hi: args.neg_hi,
    };

    // Checked before the header is written so that rejected queries print nothing.
    calc.check_role(role)?;
    mods.validate(&calc, role, args.output_calculation, query_kind(action))?;

    writeln!(out, "Architecture: {arch}")?;
    writeln!(out, "Instruction: {}", desc.mnemonic.to_ascii_uppercase())?;
    match action {
        Action::GetRegister => {
            let coord = LogicalCoordinate::new(
                role,
                args.i_coordinate,
                args.j_coordinate,
                args.k_coordinate,
                args.block,
            );
            for line in get_register(&calc, &coord, &mods, args.output_calculation)? {
                writeln!(out, "{line}")?;
            }
        }
        Action::MatrixEntry => {
            let entry = matrix_entry(
                &calc,
                role,
                args.register,
                args.lane,
                &mods,
                args.output_calculation,
            )?;
            writeln!(out, "{entry}")?;
        }
        Action::RegisterLayout => {
            let tables = register_layout(&calc, role, &mods, args.transpose)?;
            write_tables(out, &tables, format)?;
        }
        Action::MatrixLayout => {
            let table = matrix_layout(&calc, role, &mods, args.transpose)?;
            write_tables(out, std::slice::from_ref(&table), format)?;
        }
    }
    Ok(())
}

fn architecture(args: &Args) -> anyhow::Result<Architecture> {
    let Some(name) = args.architecture.as_deref() else {
        let choices = Architecture::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        bail!("\"--architecture\" argument required. Please choose between: {choices}");
    };
    Ok(Architecture::from_name(name).ok_or_else(|| CatalogError::unknown_architecture(name))?)
}

fn instruction(
    args: &Args,
    catalog: &'static Catalog,
    arch: Architecture,
) -> anyhow::Result<&'static InstructionDescriptor> {
    let Some(mnemonic) = args.instruction.as_deref() else {
        bail!("\"--instruction\" argument required.");
    };
    match catalog.find(arch, mnemonic) {
        Some(desc) => Ok(desc),
        None => {
            let err = CatalogError::UnknownInstruction {
                arch,
                mnemonic: mnemonic.to_owned(),
            };
            bail!("{err}\n{}", instruction_list(catalog, arch).trim_end())
        }
    }
}

/// The `--list-instructions` text: a heading and one indented mnemonic per line.
#[must_use]
pub fn instruction_list(catalog: &Catalog, arch: Architecture) -> String {
    let mut text = format!("Available instructions in the {arch} architecture:\n");
    for desc in catalog.instructions(arch) {
        text.push_str("    ");
        text.push_str(desc.mnemonic);
        text.push('\n');
    }
    text
}

fn action(args: &Args) -> anyhow::Result<Action> {
    let chosen: Vec<Action> = [
        (args.get_register, Action::GetRegister),
        (args.matrix_entry, Action::MatrixEntry),
        (args.register_layout, Action::RegisterLayout),
        (args.matrix_layout, Action::MatrixLayout),
    ]
    .into_iter()
    .filter_map(|(set, action)| set.then_some(action))
    .collect();
    match chosen.as_slice() {
        [action] => Ok(*action),
        _ => bail!(
            "Please choose {}one of: '--get-register', '--matrix-entry', \
             '--register-layout', '--matrix-layout', or '--detail-instruction'",
            if chosen.len() > 1 { "only " } else { "" }
        ),
    }
}

fn role(args: &Args, action: Action) -> anyhow::Result<MatrixRole> {
    let chosen: Vec<MatrixRole> = [
        (args.a_matrix, MatrixRole::A),
        (args.b_matrix, MatrixRole::B),
        (args.c_matrix, MatrixRole::C),
        (args.d_matrix, MatrixRole::D),
        (args.k_matrix, MatrixRole::K),
    ]
    .into_iter()
    .filter_map(|(set, role)| set.then_some(role))
    .collect();
    match chosen.as_slice() {
        [role] => Ok(*role),
        _ => bail!(
            "For the chosen option, '{}', please choose {}one of: '--A-matrix', \
             '--B-matrix', '--C-matrix', '--D-matrix', or '--K-matrix'",
            action.flag(),
            if chosen.len() > 1 { "only " } else { "" }
        ),
    }
}

fn table_format(args: &Args) -> anyhow::Result<TableFormat> {
    match (args.csv, args.markdown, args.asciidoc) {
        (false, false, false) => Ok(TableFormat::Grid),
        (true, false, false) => Ok(TableFormat::Csv),
        (false, true, false) => Ok(TableFormat::Markdown),
        (false, false, true) => Ok(TableFormat::Asciidoc),
        _ => bail!("Can only use one of \"--csv\", \"--markdown\", and \"--asciidoc\" at the same time."),
    }
}

fn query_kind(action: Action) -> mic_calc::QueryKind {
    match action {
        Action::GetRegister => mic_calc::QueryKind::GetRegister,
        Action::MatrixEntry => mic_calc::QueryKind::MatrixEntry,
        Action::RegisterLayout => mic_calc::QueryKind::RegisterLayout,
        Action::MatrixLayout => mic_calc::QueryKind::MatrixLayout,
    }
}

fn write_tables(out: &mut dyn Write, tables: &[LayoutTable], format: TableFormat) -> anyhow::Result<()> {
    for table in tables {
        write!(out, "{}", render(table, format))?;
    }
    Ok(())
}
