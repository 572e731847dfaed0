//! A proof checker for Typographical Number Theory: a recognizer for its
//! term/formula grammar and a derivation engine that admits a new
//! theorem only as an axiom, an existing theorem, or the conclusion of
//! one of the inference rules.

pub mod automaton;
mod corethy;
pub mod kernel;
mod lexer;
pub mod parser;
mod print;
mod types;

pub use corethy::AXIOMS;
pub use kernel::{Derivation, Rule};
pub use parser::{is_numeral, is_term, is_variable, numeral, term_variables};
pub use types::{
  Connective, Formula, FormulaInfo, InvalidStep, Quant, SyntaxError, Term, TermOp, VarName, VarSet,
};

/// Whether `s` is a well-formed formula.
pub fn is_well_formed_formula(s: &str) -> bool {
  automaton::formula_info(s).is_some()
}

/// The free and quantified variable sets of `s`, if it is well formed.
pub fn formula_info(s: &str) -> Option<FormulaInfo> {
  automaton::formula_info(s)
}

pub fn free_variables(s: &str) -> Option<VarSet> {
  automaton::formula_info(s).map(|info| info.free)
}

pub fn quantified_variables(s: &str) -> Option<VarSet> {
  automaton::formula_info(s).map(|info| info.quantified)
}
