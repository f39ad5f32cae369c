//! Program Loader.
//!
//! This module turns program files into loadable images. It performs:
//! 1. **Flat binaries:** Little-endian instruction words placed contiguously at a base address.
//! 2. **ELF images:** 32-bit RISC-V executables; code sections go to program memory,
//!    allocated data sections to data memory, and the entry point becomes the start PC.
//! 3. **Placement:** Copies an image into an `ArchitecturalState`.

use std::fs;
use std::path::Path;

use object::{Architecture, Object, ObjectSection, SectionKind};

use crate::common::constants::INSTRUCTION_LENGTH;
use crate::common::error::SimError;
use crate::core::state::ArchitecturalState;

/// ELF magic number.
const ELF_MAGIC: &[u8] = b"\x7fELF";

/// A run of instruction words starting at `address`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSegment {
    /// Address of the first word.
    pub address: u32,
    /// Encoded instructions.
    pub words: Vec<u32>,
}

/// Initialised data starting at `address`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataSegment {
    /// Address of the first byte.
    pub address: u32,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// A loadable program image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    /// Address of the first instruction to execute.
    pub entry: u32,
    /// Code placed in program memory.
    pub text: Vec<TextSegment>,
    /// Data placed in data memory.
    pub data: Vec<DataSegment>,
}

impl Program {
    /// Builds a program from instruction words laid out contiguously at `base`.
    pub fn from_words(base: u32, words: Vec<u32>) -> Self {
        Self {
            entry: base,
            text: vec![TextSegment {
                address: base,
                words,
            }],
            data: Vec::new(),
        }
    }

    /// Number of instruction words across all text segments.
    pub fn instruction_count(&self) -> usize {
        self.text.iter().map(|s| s.words.len()).sum()
    }

    /// Places the image into `state` and points the PC at the entry address.
    ///
    /// # Returns
    ///
    /// `SimError::Load` if a data segment falls outside the data memory window.
    pub fn place(&self, state: &mut ArchitecturalState) -> Result<(), SimError> {
        for segment in &self.text {
            state.instruction_memory.load(segment.address, &segment.words);
        }
        for segment in &self.data {
            for (addr, &byte) in (segment.address..).zip(&segment.bytes) {
                state.memory.store_byte(addr, byte).map_err(|e| {
                    SimError::Load(format!(
                        "data segment at {:#x} does not fit data memory: {e}",
                        segment.address
                    ))
                })?;
            }
        }
        state.program_counter = self.entry;
        Ok(())
    }
}

/// Splits a little-endian byte stream into instruction words.
///
/// # Returns
///
/// `SimError::Load` if the length is not a multiple of the instruction length.
pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<u32>, SimError> {
    let width = INSTRUCTION_LENGTH as usize;
    if bytes.len() % width != 0 {
        return Err(SimError::Load(format!(
            "program size {} is not a multiple of {width} bytes",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(width)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Loads a flat binary placed at `base`.
pub fn load_flat(bytes: &[u8], base: u32) -> Result<Program, SimError> {
    Ok(Program::from_words(base, words_from_bytes(bytes)?))
}

/// Loads a 32-bit RISC-V ELF executable.
///
/// # Returns
///
/// `SimError::Load` if the file is not a 32-bit RISC-V ELF or has no code.
pub fn load_elf(bytes: &[u8]) -> Result<Program, SimError> {
    let file = object::File::parse(bytes).map_err(|e| SimError::Load(e.to_string()))?;
    if file.architecture() != Architecture::Riscv32 {
        return Err(SimError::Load(format!(
            "expected a 32-bit RISC-V ELF, found {:?}",
            file.architecture()
        )));
    }

    let mut program = Program {
        entry: file.entry() as u32,
        text: Vec::new(),
        data: Vec::new(),
    };
    for section in file.sections() {
        let address = section.address() as u32;
        match section.kind() {
            SectionKind::Text => {
                let bytes = section.data().map_err(|e| SimError::Load(e.to_string()))?;
                tracing::debug!(
                    section = section.name().unwrap_or("?"),
                    address = format_args!("{address:#x}"),
                    size = bytes.len(),
                    "text section"
                );
                program.text.push(TextSegment {
                    address,
                    words: words_from_bytes(bytes)?,
                });
            }
            SectionKind::Data | SectionKind::ReadOnlyData => {
                let bytes = section.data().map_err(|e| SimError::Load(e.to_string()))?;
                program.data.push(DataSegment {
                    address,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }
    if program.text.is_empty() {
        return Err(SimError::Load("ELF file has no executable sections".into()));
    }
    Ok(program)
}

/// Reads a program file, detecting ELF images by their magic number.
///
/// # Arguments
///
/// * `path` - Path to an ELF executable or a flat little-endian binary.
/// * `base` - Load address for flat binaries.
pub fn load_file(path: impl AsRef<Path>, base: u32) -> Result<Program, SimError> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).map_err(|e| SimError::Load(format!("{}: {e}", path.display())))?;
    if bytes.starts_with(ELF_MAGIC) {
        load_elf(&bytes)
    } else {
        load_flat(&bytes, base)
    }
}
