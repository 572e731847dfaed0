use std::fmt::{self, Display, Formatter};

use crate::types::*;

// Rendering is the exact inverse of parsing: every rule works on the
// rendered text, so a formula must print back to the very string it was
// recognized from.

fn succs(n: usize, f: &mut Formatter<'_>) -> fmt::Result {
  for _ in 0..n {
    f.write_str("S")?
  }
  Ok(())
}

impl Display for VarName {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.letter as char)?;
    for _ in 0..self.primes {
      write!(f, "{}", PRIME)?
    }
    Ok(())
  }
}

impl Display for TermOp {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      TermOp::Add => "+",
      TermOp::Mul => "⋅",
    })
  }
}

impl Display for Connective {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Connective::And => "∧",
      Connective::Or => "∨",
      Connective::Implies => "⊃",
    })
  }
}

impl Display for Quant {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Quant::Forall => "∀",
      Quant::Exists => "∃",
    })
  }
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match *self {
      Term::Num { succs: n } => {
        succs(n, f)?;
        f.write_str("0")
      }
      Term::Var { succs: n, name } => {
        succs(n, f)?;
        write!(f, "{}", name)
      }
      Term::Pair { succs: n, op, ref lhs, ref rhs } => {
        succs(n, f)?;
        write!(f, "({}{}{})", lhs, op, rhs)
      }
    }
  }
}

impl Display for Formula {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match *self {
      Formula::Atom(ref t1, ref t2) => write!(f, "{}={}", t1, t2),
      Formula::Not(ref g) => write!(f, "~{}", g),
      Formula::Bin(op, ref f1, ref f2) => write!(f, "<{}{}{}>", f1, op, f2),
      Formula::Quantified(q, v, ref g) => write!(f, "{}{}:{}", q, v, g),
    }
  }
}
