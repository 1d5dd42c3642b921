//! The instruction information dump.
//!
//! [`InstructionInfo::build`] collects every fact about one instruction into
//! headed sections; its `Display` renders the indented text report.

use std::fmt;

use mic_catalog::{Architecture, Family, InstructionDescriptor};

use crate::arch::Calculator;
use crate::equation::Axis;
use crate::error::Result;
use crate::role::MatrixRole;

/// One headed group of `label: value` lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoSection {
    /// Heading; untitled sections print their entries at the outer indent.
    pub heading: Option<String>,
    /// Lines in print order.
    pub entries: Vec<(String, String)>,
}

impl InfoSection {
    fn untitled() -> Self {
        Self {
            heading: None,
            entries: Vec::new(),
        }
    }

    fn titled(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            entries: Vec::new(),
        }
    }

    fn line(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.entries.push((label.into(), value.to_string()));
        self
    }

    fn push(&mut self, label: impl Into<String>, value: impl ToString) {
        self.entries.push((label.into(), value.to_string()));
    }

    /// Value of the first entry labelled `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Full description of one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionInfo {
    /// Owning architecture.
    pub arch: Architecture,
    /// Instruction mnemonic.
    pub mnemonic: &'static str,
    /// Sections in print order.
    pub sections: Vec<InfoSection>,
}

impl InstructionInfo {
    /// Collects the report for `desc`, computing register usage and
    /// equations at every permitted wavefront width.
    ///
    /// # Errors
    ///
    /// Propagates [`CalcError`](crate::CalcError) from binding a calculator,
    /// which only fails for a catalog entry with no permitted wave width.
    pub fn build(desc: &InstructionDescriptor) -> Result<Self> {
        let family = desc.arch.family();
        let waves = family.permitted_wave_widths();
        let calcs = waves
            .iter()
            .map(|&wave| Calculator::new(desc, wave))
            .collect::<Result<Vec<_>>>()?;

        let mut sections = vec![opcode(desc, family), dimensions(desc, family), statistics(desc, family)];
        for calc in &calcs {
            sections.push(register_usage(calc, calcs.len() > 1));
        }
        sections.push(encoding(desc, family));
        sections.push(data_types(desc));
        match family {
            Family::Gfx9 => {
                sections.push(capabilities(desc));
                sections.push(
                    InfoSection::titled("Register modifiers")
                        .line("CBSZ and ABID bits supported", py_bool(desc.cbsz_abid))
                        .line("BLGP bits supported", py_bool(desc.blgp)),
                );
            }
            Family::Gfx11 => sections.push(
                InfoSection::titled("Register modifiers")
                    .line("OPSEL[1:0] supported", py_bool(false))
                    .line("OPSEL[2] supported", py_bool(desc.cd_opsel))
                    .line("NEG bits supported", py_bool(desc.neg)),
            ),
            Family::Gfx12 => sections.push(
                InfoSection::titled("Register modifiers")
                    .line("OPSEL index set select supported", py_bool(desc.sparse))
                    .line("NEG bits supported", py_bool(desc.neg)),
            ),
        }
        if desc.sparse {
            if let Some(calc) = calcs.first() {
                sections.push(sparsity(calc, family));
            }
        }
        for calc in &calcs {
            let wave = (calcs.len() > 1).then_some(calc.wave_width());
            sections.push(forward_equations(calc, wave)?);
            sections.push(inverse_equations(calc, wave)?);
        }

        Ok(Self {
            arch: desc.arch,
            mnemonic: desc.mnemonic,
            sections,
        })
    }

    /// The section titled `heading`.
    #[must_use]
    pub fn section(&self, heading: &str) -> Option<&InfoSection> {
        self.sections
            .iter()
            .find(|s| s.heading.as_deref() == Some(heading))
    }
}

impl fmt::Display for InstructionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Architecture: {}", self.arch)?;
        writeln!(f, "Instruction: {}", self.mnemonic.to_ascii_uppercase())?;
        for section in &self.sections {
            let indent = match &section.heading {
                Some(heading) => {
                    writeln!(f, "    {heading}:")?;
                    8
                }
                None => 4,
            };
            for (label, value) in &section.entries {
                writeln!(f, "{:indent$}{label}: {value}", "")?;
            }
        }
        Ok(())
    }
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn opcode(desc: &InstructionDescriptor, family: Family) -> InfoSection {
    let mut section = InfoSection::untitled()
        .line("Encoding", family.encoding_name())
        .line("VOP3P Opcode", format!("{:#x}", desc.opcode));
    if family == Family::Gfx9 {
        section.push("VOP3P-MAI Opcode", format!("{:#x}", desc.opcode & 0x3f));
    }
    section
}

fn dimensions(desc: &InstructionDescriptor, family: Family) -> InfoSection {
    let mut section = InfoSection::titled("Matrix Dimensions")
        .line("M", desc.m)
        .line("N", desc.n)
        .line("K", desc.k);
    if family == Family::Gfx9 {
        section.push("blocks", desc.blocks);
    }
    section
}

fn statistics(desc: &InstructionDescriptor, family: Family) -> InfoSection {
    let ops = desc.operations();
    let op_name = if desc.integer { "Ops" } else { "FLOPs" };
    let per_unit = ops / u64::from(desc.cycles.max(1)) * 4;
    let coexec = desc
        .coexec_delay
        .map(|delay| i64::from(desc.cycles) - i64::from(delay))
        .filter(|cycles| *cycles > 0);

    let mut section = InfoSection::titled("Execution statistics")
        .line(op_name, ops)
        .line("Execution cycles", desc.cycles)
        .line(format!("{op_name}/{}/cycle", family.compute_unit_name()), per_unit)
        .line("Can co-execute with VALU", py_bool(coexec.is_some()));
    if let Some(cycles) = coexec {
        section.push("VALU co-execution cycles possible", cycles);
    }
    section
}

fn register_usage(calc: &Calculator, per_wave: bool) -> InfoSection {
    let heading = if per_wave {
        format!("Wave{} register usage", calc.wave_width())
    } else {
        "Register usage".to_owned()
    };
    let mut section = InfoSection::titled(heading);
    for role in MatrixRole::ALL.into_iter().filter(|r| calc.role_supported(*r)) {
        section.push(format!("GPRs required for {role}"), calc.register_count(role));
    }
    section.push(
        "GPR alignment requirement",
        format!("{} bytes", calc.descriptor().gpr_byte_align),
    );
    section
}

fn src2_role(desc: &InstructionDescriptor) -> MatrixRole {
    if desc.sparse {
        MatrixRole::K
    } else {
        MatrixRole::C
    }
}

fn encoding(desc: &InstructionDescriptor, family: Family) -> InfoSection {
    let mut section = InfoSection::titled(format!("{} register encoding", family.encoding_name()));
    for role in [MatrixRole::A, MatrixRole::B, src2_role(desc), MatrixRole::D] {
        section.push(format!("{role} matrix source field"), role.source_field());
    }
    section
}

fn data_types(desc: &InstructionDescriptor) -> InfoSection {
    let src2 = if desc.sparse {
        "Sparsity index (2-bit compression indices)"
    } else {
        desc.out_type.description()
    };
    InfoSection::titled("Register data types")
        .line("Src0", desc.a_type.description())
        .line("Src1", desc.b_type.description())
        .line("Src2", src2)
        .line("Vdst", desc.out_type.description())
}

fn capabilities(desc: &InstructionDescriptor) -> InfoSection {
    InfoSection::titled("Register capabilities")
        .line("A matrix can use ArchVGPRs", py_bool(true))
        .line("A matrix can use AccVGPRs", py_bool(true))
        .line("B matrix can use ArchVGPRs", py_bool(true))
        .line("B matrix can use AccVGPRs", py_bool(true))
        .line("C and D matrix can use ArchVGPRs", py_bool(desc.c_d_arch))
        .line("C and D matrix can use AccVGPRs", py_bool(true))
}

fn sparsity(calc: &Calculator, family: Family) -> InfoSection {
    let selector = if family == Family::Gfx9 { "ABID" } else { "OPSEL" };
    InfoSection::titled("Sparsity")
        .line("Structured sparsity ratio", "4:2")
        .line("Compression index sets", calc.compression_set_count())
        .line("Index set selected by", selector)
}

fn title(base: &str, wave: Option<u32>) -> String {
    match wave {
        Some(wave) => format!("Wave{wave} {}{}", base[..1].to_ascii_lowercase(), &base[1..]),
        None => base.to_owned(),
    }
}

/// Label of a role's matrix in the equation listings.
fn matrix_label(calc: &Calculator, role: MatrixRole) -> &'static str {
    match role {
        MatrixRole::C | MatrixRole::D if calc.role_supported(MatrixRole::C) => "C or D",
        other => other.as_str(),
    }
}

fn equation_roles(calc: &Calculator) -> Vec<MatrixRole> {
    let mut roles = vec![MatrixRole::A, MatrixRole::B, MatrixRole::D];
    if calc.role_supported(MatrixRole::K) {
        roles.push(MatrixRole::K);
    }
    roles
}

fn forward_equations(calc: &Calculator, wave: Option<u32>) -> Result<InfoSection> {
    let suffix = if calc.family() == Family::Gfx9 { ".block" } else { "" };
    let mut section = InfoSection::titled(title("Matrix element to register mapping with no modifiers", wave));
    for role in equation_roles(calc) {
        let indices = match role {
            MatrixRole::B => "[k][j]",
            MatrixRole::C | MatrixRole::D => "[i][j]",
            MatrixRole::A | MatrixRole::K => "[i][k]",
        };
        let element = format!("{}{indices}{suffix}", matrix_label(calc, role));
        for (axis, name) in [(Axis::Register, "GPR"), (Axis::Lane, "Lane")] {
            if let Some(eq) = calc.derive_equation(role, axis, calc.wave_width())? {
                section.push(format!("{element} {name}"), eq);
            }
        }
    }
    Ok(section)
}

fn inverse_equations(calc: &Calculator, wave: Option<u32>) -> Result<InfoSection> {
    let blocks = calc.family() == Family::Gfx9;
    let mut section = InfoSection::titled(title("Register to matrix element mapping with no modifiers", wave));
    for role in equation_roles(calc) {
        let axes: &[(Axis, &str)] = match role {
            MatrixRole::A | MatrixRole::K => &[(Axis::I, "i"), (Axis::K, "k"), (Axis::Block, "block")],
            MatrixRole::B => &[(Axis::J, "j"), (Axis::K, "k"), (Axis::Block, "block")],
            MatrixRole::C | MatrixRole::D => &[(Axis::I, "i"), (Axis::J, "j"), (Axis::Block, "block")],
        };
        for &(axis, name) in axes {
            let label = format!("{} {name}", matrix_label(calc, role));
            match calc.derive_equation(role, axis, calc.wave_width())? {
                Some(eq) => section.push(label, eq),
                None if axis == Axis::Block && blocks => section.push(label, 0),
                None => {}
            }
        }
    }
    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mic_catalog::Catalog;

    fn info(arch: Architecture, mnemonic: &str) -> InstructionInfo {
        let desc = Catalog::full().find(arch, mnemonic).expect("instruction in catalog");
        InstructionInfo::build(desc).expect("info")
    }

    #[test]
    fn header_and_opcode_lines() {
        let text = info(Architecture::Cdna1, "v_mfma_f32_32x32x1f32").to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Architecture: CDNA1"));
        assert_eq!(lines.next(), Some("Instruction: V_MFMA_F32_32X32X1F32"));
        assert_eq!(lines.next(), Some("    Encoding: VOP3P-MAI"));
        assert!(text.contains("    VOP3P-MAI Opcode: 0x0\n"));
        assert!(text.contains("    Matrix Dimensions:\n        M: 32\n        N: 32\n        K: 1\n        blocks: 2\n"));
    }

    #[test]
    fn statistics_scale_by_four_units() {
        let report = info(Architecture::Cdna1, "v_mfma_f32_32x32x1f32");
        let stats = report.section("Execution statistics").expect("statistics");
        assert_eq!(stats.get("FLOPs"), Some("4096"));
        assert_eq!(stats.get("Execution cycles"), Some("64"));
        assert_eq!(stats.get("FLOPs/CU/cycle"), Some("256"));
    }

    #[test]
    fn integer_instructions_count_ops() {
        let report = info(Architecture::Rdna3, "v_wmma_i32_16x16x16_iu8");
        let stats = report.section("Execution statistics").expect("statistics");
        assert!(stats.get("Ops").is_some());
        assert!(stats.get("Ops/WGP/cycle").is_some());
    }

    #[test]
    fn register_usage_per_wave() {
        let report = info(Architecture::Rdna3, "v_wmma_f32_16x16x16_f16");
        let w32 = report.section("Wave32 register usage").expect("wave32");
        let w64 = report.section("Wave64 register usage").expect("wave64");
        assert_eq!(w32.get("GPRs required for A"), Some("8"));
        assert_eq!(w32.get("GPRs required for D"), Some("8"));
        assert_eq!(w64.get("GPRs required for D"), Some("4"));
        assert!(report.section("Wave64 matrix element to register mapping with no modifiers").is_some());
    }

    #[test]
    fn sparse_instructions_list_k() {
        let report = info(Architecture::Cdna3, "v_smfmac_f32_16x16x32_f16");
        let usage = report.section("Register usage").expect("usage");
        assert!(usage.get("GPRs required for C").is_none());
        assert!(usage.get("GPRs required for K").is_some());
        let encoding = report.section("VOP3P-MAI register encoding").expect("encoding");
        assert_eq!(encoding.get("K matrix source field"), Some("Src2"));
        let sparsity = report.section("Sparsity").expect("sparsity");
        assert_eq!(sparsity.get("Index set selected by"), Some("ABID"));
    }

    #[test]
    fn gfx9_equations_carry_block_lines() {
        let report = info(Architecture::Cdna1, "v_mfma_f32_32x32x2f32");
        let inverse = report
            .section("Register to matrix element mapping with no modifiers")
            .expect("inverse");
        assert_eq!(inverse.get("A block"), Some("0"));
        assert!(inverse.get("C or D i").is_some());
        let forward = report
            .section("Matrix element to register mapping with no modifiers")
            .expect("forward");
        assert!(forward.get("A[i][k].block Lane").is_some());
    }

    #[test]
    fn gfx11_modifier_lines() {
        let text = info(Architecture::Rdna3, "v_wmma_f16_16x16x16_f16").to_string();
        assert!(text.contains("    Register modifiers:\n        OPSEL[1:0] supported: False\n        OPSEL[2] supported: True\n"));
    }
}
