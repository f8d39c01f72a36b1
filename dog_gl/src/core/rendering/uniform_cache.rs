use std::collections::HashMap;

use super::render_api::ProgramHandle;
use super::shader::ShaderDataType;

/// What the driver told us about one active uniform at link time
#[derive(Debug, Clone, PartialEq)]
pub struct UniformInfo<L> {
    pub location: L,
    pub data_type: ShaderDataType,
    pub array_len: i32,
}

/// Uniform locations of every live program, keyed by (program, uniform name).
///
/// Entries are stored per program, so evicting a program drops all of its
/// names at once. Names match by exact bytes. An entry is never overwritten:
/// the first registration of a key wins.
#[derive(Debug)]
pub struct UniformCache<L> {
    programs: HashMap<ProgramHandle, HashMap<String, UniformInfo<L>>>,
}

impl<L> Default for UniformCache<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> UniformCache<L> {
    pub fn new() -> Self {
        UniformCache {
            programs: HashMap::new(),
        }
    }

    /// Insert or ignore. Returns true if the key was not present before
    pub fn insert(&mut self, program: ProgramHandle, name: &str, info: UniformInfo<L>) -> bool {
        let uniforms = self.programs.entry(program).or_default();
        if uniforms.contains_key(name) {
            return false;
        }
        uniforms.insert(name.to_owned(), info);
        true
    }

    pub fn lookup(&self, program: ProgramHandle, name: &str) -> Option<&UniformInfo<L>> {
        self.programs.get(&program)?.get(name)
    }

    pub fn contains(&self, program: ProgramHandle, name: &str) -> bool {
        self.lookup(program, name).is_some()
    }

    /// Drop every entry owned by `program`, returns how many were removed
    pub fn evict_program(&mut self, program: ProgramHandle) -> usize {
        self.programs
            .remove(&program)
            .map_or(0, |uniforms| uniforms.len())
    }

    pub fn program_uniform_count(&self, program: ProgramHandle) -> usize {
        self.programs.get(&program).map_or(0, HashMap::len)
    }

    /// Names cached for `program`, in no particular order
    pub fn uniform_names(&self, program: ProgramHandle) -> impl Iterator<Item = &str> {
        self.programs
            .get(&program)
            .into_iter()
            .flat_map(|uniforms| uniforms.keys().map(String::as_str))
    }

    pub fn uniforms(
        &self,
        program: ProgramHandle,
    ) -> impl Iterator<Item = (&str, &UniformInfo<L>)> {
        self.programs
            .get(&program)
            .into_iter()
            .flat_map(|uniforms| uniforms.iter().map(|(name, info)| (name.as_str(), info)))
    }

    /// Total number of entries across all programs
    pub fn len(&self) -> usize {
        self.programs.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
