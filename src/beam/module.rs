// Decoded description of one BEAM module.

/// Metadata extracted from a BEAM container.
///
/// Fields whose chunk is absent keep their default (zero / empty) value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Declared size following the envelope's size field.
    pub total_file_size: u32,
    /// Atom table in file order. Index 0 is the module name; other chunks
    /// refer to atoms by 1-based index.
    pub atoms: Vec<String>,

    // --- Code chunk header ---
    /// Instruction set version.
    pub code_version: u32,
    /// Highest opcode number used by the module.
    pub max_opcode: u32,
    pub label_count: u32,
    pub function_count: u32,
}

impl ModuleDescriptor {
    /// The module's own name (atom 0), if an atom table was present.
    pub fn module_name(&self) -> Option<&str> {
        self.atoms.first().map(String::as_str)
    }

    /// Resolve a 1-based atom index as used by the import/export tables.
    pub fn atom(&self, index: u32) -> Option<&str> {
        let i = (index as usize).checked_sub(1)?;
        self.atoms.get(i).map(String::as_str)
    }
}
