//! Extractors mapping documentation pages to entity rows
//!
//! Each extractor has two halves: a pure `parse_*` function that reads a
//! page into insert payloads, substituting empty strings for missing markup,
//! and an `extract_*` function that writes those payloads through a
//! [`Storage`](crate::storage::Storage) handle with explicit parent ids.

mod application;
mod dom;
mod example;
mod function;
mod guide;
mod module;
mod parameter;

pub use application::{extract_application, parse_application, ApplicationExtraction};
pub use dom::{collapse_whitespace, Node, Page, Scope};
pub use example::parse_examples;
pub use function::{parse_function, parse_functions, parse_name_arity, FUNCTION_SECTIONS};
pub use guide::{extract_guide, parse_guide};
pub use module::{extract_module, parse_module, strip_app_suffix};
pub use parameter::parse_parameters;

use crate::storage::{NewExample, NewFunction, NewModule, NewParameter};
use std::ops::AddAssign;

/// Number of rows inserted per entity table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    pub applications: u64,
    pub modules: u64,
    pub functions: u64,
    pub parameters: u64,
    pub examples: u64,
    pub guides: u64,
}

impl EntityCounts {
    /// Total rows across all tables
    pub fn total(&self) -> u64 {
        self.applications
            + self.modules
            + self.functions
            + self.parameters
            + self.examples
            + self.guides
    }
}

impl AddAssign for EntityCounts {
    fn add_assign(&mut self, other: Self) {
        self.applications += other.applications;
        self.modules += other.modules;
        self.functions += other.functions;
        self.parameters += other.parameters;
        self.examples += other.examples;
        self.guides += other.guides;
    }
}

/// A module page read into its full entity hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDoc {
    pub module: NewModule,
    pub functions: Vec<FunctionDoc>,
}

/// One function section with its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDoc {
    pub function: NewFunction,
    pub parameters: Vec<NewParameter>,
    pub examples: Vec<NewExample>,
}
