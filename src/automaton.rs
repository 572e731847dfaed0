//! Single-pass shift-reduce recognizer. One operator stack, one operand
//! stack; each reduction folds the free and quantified variable sets of
//! the operands it consumes and rebuilds their text. Any underflow,
//! operand/operator mismatch, or unmatched bracket makes the whole
//! input ill-formed, as does a reassembly that does not reproduce the
//! input exactly (an operator consumed away from its written position).

use crate::lexer::{Lexer, Token};
use crate::types::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Opr {
  Succ(usize),
  Eq,
  LParen,
  LAngle,
  Tilde,
  Colon,
  Term(TermOp),
  Conn(Connective),
  Quant(Quant),
}

#[derive(Debug, Clone)]
enum Opd {
  /// A reduced term: its text and its variables.
  Term(String, VarSet),
  /// A bare variable directly under a quantifier, awaiting its `:`.
  Bound(VarName),
  /// A reduced formula.
  Formula(String, VarSet, VarSet),
}

fn succ_text(n: usize, rest: &str) -> String {
  let mut text = "S".repeat(n);
  text.push_str(rest);
  text
}

#[derive(Default)]
struct Machine {
  opr: Vec<Opr>,
  opd: Vec<Opd>,
}

impl Machine {
  fn pop_term(&mut self) -> Option<(String, VarSet)> {
    match self.opd.pop()? {
      Opd::Term(text, free) => Some((text, free)),
      _ => None,
    }
  }

  fn pop_formula(&mut self) -> Option<(String, VarSet, VarSet)> {
    match self.opd.pop()? {
      Opd::Formula(text, free, quantified) => Some((text, free, quantified)),
      _ => None,
    }
  }

  fn push_formula(&mut self, text: String, free: VarSet, quantified: VarSet) {
    debug_assert!(free.is_disjoint(&quantified));
    self.opd.push(Opd::Formula(text, free, quantified))
  }

  /// Folds a pending successor run into the term below it.
  fn fold_succ(&mut self) -> Option<()> {
    if let Some(&Opr::Succ(n)) = self.opr.last() {
      self.opr.pop();
      let (text, free) = self.pop_term()?;
      self.opd.push(Opd::Term(succ_text(n, &text), free));
    }
    Some(())
  }

  /// Closes a pending `=` into an atom.
  fn fold_eq(&mut self) -> Option<()> {
    if let Some(Opr::Eq) = self.opr.last() {
      self.opr.pop();
      let (text2, free2) = self.pop_term()?;
      let (text1, mut free) = self.pop_term()?;
      free.extend(free2);
      self.push_formula(format!("{}={}", text1, text2), free, VarSet::new());
    }
    Some(())
  }

  /// Drains every `~` and `v:` waiting below the reduction point.
  fn fold_unary(&mut self) -> Option<()> {
    loop {
      match self.opr.last() {
        Some(Opr::Tilde) => {
          self.opr.pop();
          let (text, free, quantified) = self.pop_formula()?;
          self.push_formula(format!("~{}", text), free, quantified);
        }
        Some(Opr::Colon) => {
          self.opr.pop();
          let (text, mut free, mut quantified) = self.pop_formula()?;
          let v = match self.opd.pop()? {
            Opd::Bound(v) => v,
            _ => return None,
          };
          let q = match self.opr.pop()? {
            Opr::Quant(q) => q,
            _ => return None,
          };
          // the bound variable must be free in the body
          if !free.remove(&v) { return None }
          quantified.insert(v);
          self.push_formula(format!("{}{}:{}", q, v, text), free, quantified);
        }
        _ => return Some(()),
      }
    }
  }
}

pub fn formula_info(s: &str) -> Option<FormulaInfo> {
  let mut st = Machine::default();
  let mut lexer = Lexer::from(s);
  while let Some(tk) = lexer.next() {
    match tk {
      Token::Var(v) => {
        if matches!(st.opr.last(), Some(Opr::Quant(_))) {
          st.opd.push(Opd::Bound(v))
        } else {
          let mut free = VarSet::new();
          free.insert(v);
          st.opd.push(Opd::Term(v.to_string(), free))
        }
      }
      Token::SuccVar(n, v) => {
        let mut free = VarSet::new();
        free.insert(v);
        st.opd.push(Opd::Term(succ_text(n, &v.to_string()), free))
      }
      Token::Numeral(n) => st.opd.push(Opd::Term(succ_text(n, "0"), VarSet::new())),
      Token::Succ(n) => st.opr.push(Opr::Succ(n)),
      Token::Char(c) => match c {
        '(' => st.opr.push(Opr::LParen),
        '<' => st.opr.push(Opr::LAngle),
        '~' => st.opr.push(Opr::Tilde),
        ':' => st.opr.push(Opr::Colon),
        '∀' => st.opr.push(Opr::Quant(Quant::Forall)),
        '∃' => st.opr.push(Opr::Quant(Quant::Exists)),
        '+' => st.opr.push(Opr::Term(TermOp::Add)),
        '⋅' => st.opr.push(Opr::Term(TermOp::Mul)),
        '=' => {
          st.fold_succ()?;
          st.opr.push(Opr::Eq)
        }
        ')' => {
          let (text2, free2) = st.pop_term()?;
          let (text1, mut free) = st.pop_term()?;
          let op = match st.opr.pop()? {
            Opr::Term(op) => op,
            _ => return None,
          };
          match st.opr.pop()? {
            Opr::LParen => {}
            _ => return None,
          }
          free.extend(free2);
          st.opd.push(Opd::Term(format!("({}{}{})", text1, op, text2), free));
          st.fold_succ()?;
        }
        '∧' | '∨' | '⊃' => {
          st.fold_succ()?;
          st.fold_eq()?;
          st.fold_unary()?;
          st.opr.push(Opr::Conn(match c {
            '∧' => Connective::And,
            '∨' => Connective::Or,
            _ => Connective::Implies,
          }))
        }
        '>' => {
          st.fold_eq()?;
          st.fold_unary()?;
          let (text2, free2, quantified2) = st.pop_formula()?;
          let (text1, mut free, mut quantified) = st.pop_formula()?;
          let conn = match st.opr.pop()? {
            Opr::Conn(conn) => conn,
            _ => return None,
          };
          match st.opr.pop()? {
            Opr::LAngle => {}
            _ => return None,
          }
          free.extend(free2);
          quantified.extend(quantified2);
          if !free.is_disjoint(&quantified) { return None }
          st.opd.push(Opd::Formula(
            format!("<{}{}{}>", text1, conn, text2),
            free,
            quantified,
          ));
        }
        _ => return None, // outside the alphabet
      },
    }
  }
  while let Some(&op) = st.opr.last() {
    match op {
      Opr::Succ(_) => st.fold_succ()?,
      Opr::Eq => st.fold_eq()?,
      Opr::Tilde | Opr::Colon => st.fold_unary()?,
      _ => return None,
    }
  }
  let result = st.opd.pop()?;
  if !st.opd.is_empty() { return None }
  match result {
    // an operator may only act where it was written
    Opd::Formula(text, free, quantified) if text == s => Some(FormulaInfo { free, quantified }),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser;

  fn vars(s: &str) -> VarSet {
    parser::term_variables(s)
  }

  #[test]
  fn accepts_the_corpus() {
    for s in [
      "∀a:a=SSSS0",
      "~∃a:(a⋅a)=a",
      "∀a:∀b:<~a=b⊃~Sa=Sb>",
      "<S0=0⊃∀a:~∃b:(b⋅SS0)=a>",
      "∀c:<∃d:(c⋅d)=b⊃∃d:(d⋅SS0)=c>",
      "S0=0",
      "~<0=0⊃S0=0>",
      "<b=b∨~∃c:c=b>",
      "∀b:<b=b∨~∃c:c=b>",
      "~∀a:(0+a)=a",
    ] {
      assert!(formula_info(s).is_some(), "{}", s);
    }
  }

  #[test]
  fn rejects_terms_junk_and_fragments() {
    for s in [
      "",
      "0",
      "Sa",
      "(a+b)",
      "a=",
      "=a",
      "<a=0>",
      "<a=0∧>",
      "<a=0∧b=0",
      "a=0∧b=0>",
      "∀a:",
      "∀:a=0",
      "∀0:0=0",
      "~",
      "<<a=0⊃b=0>",
      "S0=0′",
      "x=y)",
      "q(a+b)=0",
    ] {
      assert!(formula_info(s).is_none(), "{}", s);
    }
  }

  #[test]
  fn rejects_operators_away_from_their_position() {
    // these reduce cleanly on the stacks but reassemble differently
    for s in ["a~=0", "aS=0", "(a+b)S=0"] {
      assert!(formula_info(s).is_none(), "{}", s);
    }
  }

  #[test]
  fn vacuous_quantification_rejected() {
    assert!(formula_info("∀a:a=a").is_some());
    assert!(formula_info("∀a:b=b").is_none());
    assert!(formula_info("∃b:∀a:a=a").is_none());
  }

  #[test]
  fn capture_collision_rejected() {
    assert!(formula_info("<a=0∧∀a:a=a>").is_none());
    assert!(formula_info("<∀a:a=a∧a=0>").is_none());
  }

  #[test]
  fn variable_sets_fold_through_reductions() {
    let info = formula_info("∀c:<∃d:(c⋅d)=b⊃∃d:(d⋅SS0)=c>").unwrap();
    assert_eq!(info.free, vars("b"));
    assert_eq!(info.quantified, vars("c d"));

    let info = formula_info("∀a:<∃a′:(a⋅a′)=a′′⊃∃a′:(a′⋅SS0)=a>").unwrap();
    assert_eq!(info.free, vars("a′′"));
    assert_eq!(info.quantified, vars("a a′"));
  }

  #[test]
  fn power_of_ten_formula() {
    let s = "∃a:∃x:∃y:<<∃d:∃e:<x=(d⋅SSy)∧y=Se>∧∃d:∃e:<x=((d⋅S(Sa⋅y))+b)∧(Sa⋅y)=(b+e)>>∧∀k:∀z:<<∃n:(k+Sn)=a∧∃d:∃e:<x=((d⋅S(Sk⋅y))+z)∧(Sk⋅y)=(z+e)>>⊃∃d:∃e:<x=((d⋅S(SSk⋅y))+(SSSSSSSSSS0⋅z))∧S(SSk⋅y)=(S(SSSSSSSSSS0⋅z)+e)>>>";
    let info = formula_info(s).expect("power-of-ten formula");
    assert_eq!(info.free, vars("b"));
  }

  #[test]
  fn free_and_quantified_stay_disjoint() {
    for s in ["∀a:a=SSSS0", "∀a:∀b:<~a=b⊃~Sa=Sb>", "∀b:<b=b∨~∃c:c=b>"] {
      let info = formula_info(s).unwrap();
      assert!(info.free.is_disjoint(&info.quantified), "{}", s);
    }
  }
}
