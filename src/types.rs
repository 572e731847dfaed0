use std::collections::BTreeSet;

use thiserror::Error;

/// The prime mark that distinguishes `a`, `a′`, `a′′`, ...
pub const PRIME: char = '\u{2032}';

/// A variable: a lowercase letter followed by zero or more prime marks.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarName {
  pub letter: u8,
  pub primes: u32,
}

pub type VarSet = BTreeSet<VarName>;

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum TermOp {
  Add,
  Mul,
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Connective {
  And,
  Or,
  Implies,
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Quant {
  Forall,
  Exists,
}

/// A term, with its successor prefix folded into the node: `SS(a+b)` is
/// one `Pair` node with `succs = 2`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Term {
  Num { succs: usize },
  Var { succs: usize, name: VarName },
  Pair { succs: usize, op: TermOp, lhs: Box<Term>, rhs: Box<Term> },
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Formula {
  Atom(Term, Term),
  Not(Box<Formula>),
  Bin(Connective, Box<Formula>, Box<Formula>),
  Quantified(Quant, VarName, Box<Formula>),
}

/// Free and quantified variable sets of a well-formed formula. For any
/// formula the recognizers accept, `free` and `quantified` are disjoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormulaInfo {
  pub free: VarSet,
  pub quantified: VarSet,
}

#[derive(Clone, Debug, Error)]
#[error("not a well-formed formula: {text}")]
pub struct SyntaxError {
  pub text: String,
}

#[derive(Clone, Debug, Error)]
#[error("step does not follow from the current theorems: {text}")]
pub struct InvalidStep {
  pub text: String,
}

impl Term {
  pub fn succs(&self) -> usize {
    match *self {
      Term::Num { succs } | Term::Var { succs, .. } | Term::Pair { succs, .. } => succs,
    }
  }

  fn set_succs(&self, succs: usize) -> Term {
    match self.clone() {
      Term::Num { .. } => Term::Num { succs },
      Term::Var { name, .. } => Term::Var { succs, name },
      Term::Pair { op, lhs, rhs, .. } => Term::Pair { succs, op, lhs, rhs },
    }
  }

  /// `S^n` applied to this term.
  pub fn add_succs(&self, n: usize) -> Term {
    self.set_succs(self.succs() + n)
  }

  /// Removes `n` leading successor marks, if the term has that many.
  pub fn strip_succs(&self, n: usize) -> Option<Term> {
    Some(self.set_succs(self.succs().checked_sub(n)?))
  }

  fn collect_vars(&self, out: &mut VarSet) {
    match *self {
      Term::Num { .. } => {}
      Term::Var { name, .. } => {
        out.insert(name);
      }
      Term::Pair { ref lhs, ref rhs, .. } => {
        lhs.collect_vars(out);
        rhs.collect_vars(out);
      }
    }
  }

  pub fn variables(&self) -> VarSet {
    let mut out = VarSet::new();
    self.collect_vars(&mut out);
    out
  }
}

impl Formula {
  pub fn info(&self) -> FormulaInfo {
    match *self {
      Formula::Atom(ref t1, ref t2) => {
        let mut free = t1.variables();
        free.extend(t2.variables());
        FormulaInfo { free, quantified: VarSet::new() }
      }
      Formula::Not(ref f) => f.info(),
      Formula::Bin(_, ref f1, ref f2) => {
        let mut i = f1.info();
        let i2 = f2.info();
        i.free.extend(i2.free);
        i.quantified.extend(i2.quantified);
        i
      }
      Formula::Quantified(_, v, ref f) => {
        let mut i = f.info();
        i.free.remove(&v);
        i.quantified.insert(v);
        i
      }
    }
  }
}
