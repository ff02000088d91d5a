use crate::ast::Expression;
use crate::compiler::ConditionCompiler;
use crate::error::{CompileError, StorageError};
use crate::model::{Action, Flow, StepCategory, StepContext};
use bincode::config::standard;
use bincode::{Decode, Encode, decode_from_slice, encode_to_vec};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// A step as shipped to the game client: conditions are pre-compiled and
/// the next-step link is resolved to an index.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct PublishedStep {
    pub id: String,
    pub legacy: u32,
    pub category: StepCategory,
    pub context: Option<StepContext>,
    pub actions: Vec<Action>,
    pub exit_actions: Vec<Action>,
    pub entry: Expression,
    pub completion: Expression,
    /// Index of the following step; `None` ends the flow.
    pub next: Option<u32>,
}

/// The runtime bundle produced by publishing a flow.
#[derive(Encode, Decode, Debug, Clone, PartialEq)]
pub struct PublishedFlow {
    pub id: String,
    pub name: String,
    pub legacy: u32,
    pub priority: i32,
    pub steps: Vec<PublishedStep>,
}

impl PublishedFlow {
    /// Compiles a flow with the built-in condition parsers.
    pub fn compile(flow: &Flow) -> Result<Self, CompileError> {
        Self::compile_with(flow, &ConditionCompiler::default())
    }

    pub fn compile_with(flow: &Flow, compiler: &ConditionCompiler) -> Result<Self, CompileError> {
        let steps = flow
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                Ok(PublishedStep {
                    id: step.id.clone(),
                    legacy: step.legacy,
                    category: step.category,
                    context: step.context.clone(),
                    actions: step.actions.clone(),
                    exit_actions: step.exit_actions.clone(),
                    entry: compiler.compile(&step.entry_conditions)?,
                    completion: compiler.compile(&step.completion_conditions)?,
                    next: flow.next_index(index).map(|i| i as u32),
                })
            })
            .collect::<Result<_, CompileError>>()?;

        Ok(Self {
            id: flow.id.clone(),
            name: flow.name.clone(),
            legacy: flow.legacy,
            priority: flow.priority,
            steps,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StorageError> {
        encode_to_vec(self, standard()).map_err(|e| StorageError::Encode(e.to_string()))
    }

    /// Saves the bundle to a file using the bincode format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let io_error = |source| StorageError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut file = fs::File::create(path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        Ok(())
    }

    /// Loads a bundle from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let io_error = |source| StorageError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut file = fs::File::open(path).map_err(io_error)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_error)?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a bundle from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        decode_from_slice(bytes, standard())
            .map(|(bundle, _)| bundle) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| StorageError::Decode(e.to_string()))
    }
}
