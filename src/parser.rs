//! Recursive-descent recognizer: tries each production at each split
//! point, building the explicit parse tree. The shift-reduce pass in
//! `automaton` accepts exactly the same strings; this one also serves
//! structural substitution and the round-trip checks.

use crate::types::*;

impl VarName {
  pub fn parse(s: &str) -> Option<VarName> {
    let mut cs = s.chars();
    let letter = cs.next()?;
    if !letter.is_ascii_lowercase() { return None }
    let mut primes = 0;
    for c in cs {
      if c != PRIME { return None }
      primes += 1;
    }
    Some(VarName { letter: letter as u8, primes })
  }
}

/// `S*0`
pub fn is_numeral(s: &str) -> bool {
  s.trim_start_matches('S') == "0"
}

/// A lowercase letter followed by zero or more prime marks.
pub fn is_variable(s: &str) -> bool {
  VarName::parse(s).is_some()
}

pub fn is_term(s: &str) -> bool {
  parse_term(s).is_some()
}

/// The numeral denoting `n`: `n` successor marks applied to `0`.
pub fn numeral(n: usize) -> String {
  let mut s = "S".repeat(n);
  s.push('0');
  s
}

/// Every variable occurring in `s`, read off lexically. Defined on
/// arbitrary strings, not just terms.
pub fn term_variables(s: &str) -> VarSet {
  let mut out = VarSet::new();
  let mut cs = s.chars().peekable();
  while let Some(c) = cs.next() {
    if c.is_ascii_lowercase() {
      let mut primes = 0;
      while cs.peek() == Some(&PRIME) {
        cs.next();
        primes += 1;
      }
      out.insert(VarName { letter: c as u8, primes });
    }
  }
  out
}

pub fn parse_term(s: &str) -> Option<Term> {
  let body = s.trim_start_matches('S');
  let succs = s.len() - body.len();
  if body.is_empty() { return None }
  if body.starts_with('(') && body.ends_with(')') {
    for (i, c) in body.char_indices() {
      let op = match c {
        '+' => TermOp::Add,
        '⋅' => TermOp::Mul,
        _ => continue,
      };
      if let (Some(lhs), Some(rhs)) =
        (parse_term(&body[1..i]), parse_term(&body[i + c.len_utf8()..body.len() - 1]))
      {
        return Some(Term::Pair { succs, op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
      }
    }
  }
  if body == "0" { return Some(Term::Num { succs }) }
  let name = VarName::parse(body)?;
  Some(Term::Var { succs, name })
}

pub fn parse_formula(s: &str) -> Option<Formula> {
  parse_atom(s)
    .or_else(|| parse_negation(s))
    .or_else(|| parse_compound(s))
    .or_else(|| parse_quantification(s))
}

fn parse_atom(s: &str) -> Option<Formula> {
  for (i, c) in s.char_indices() {
    if c == '=' {
      if let (Some(t1), Some(t2)) = (parse_term(&s[..i]), parse_term(&s[i + 1..])) {
        return Some(Formula::Atom(t1, t2))
      }
    }
  }
  None
}

fn parse_negation(s: &str) -> Option<Formula> {
  let f = parse_formula(s.strip_prefix('~')?)?;
  Some(Formula::Not(Box::new(f)))
}

fn parse_compound(s: &str) -> Option<Formula> {
  if !(s.starts_with('<') && s.ends_with('>')) { return None }
  for (i, c) in s.char_indices() {
    let op = match c {
      '∧' => Connective::And,
      '∨' => Connective::Or,
      '⊃' => Connective::Implies,
      _ => continue,
    };
    if let (Some(f1), Some(f2)) =
      (parse_formula(&s[1..i]), parse_formula(&s[i + c.len_utf8()..s.len() - 1]))
    {
      let (i1, i2) = (f1.info(), f2.info());
      // one variable may not be free on one side and bound on the other
      if i1.free.union(&i2.free).any(|v| i1.quantified.contains(v) || i2.quantified.contains(v)) {
        return None
      }
      return Some(Formula::Bin(op, Box::new(f1), Box::new(f2)))
    }
  }
  None
}

fn parse_quantification(s: &str) -> Option<Formula> {
  let (quant, rest) = if let Some(rest) = s.strip_prefix('∀') {
    (Quant::Forall, rest)
  } else if let Some(rest) = s.strip_prefix('∃') {
    (Quant::Exists, rest)
  } else {
    return None
  };
  let colon = rest.find(':')?;
  let v = VarName::parse(&rest[..colon])?;
  let f = parse_formula(&rest[colon + 1..])?;
  // vacuous binding is malformed
  if !f.info().free.contains(&v) { return None }
  Some(Formula::Quantified(quant, v, Box::new(f)))
}

impl Term {
  pub fn parse(s: &str) -> Result<Term, SyntaxError> {
    parse_term(s).ok_or_else(|| SyntaxError { text: s.to_owned() })
  }
}

impl Formula {
  pub fn parse(s: &str) -> Result<Formula, SyntaxError> {
    parse_formula(s).ok_or_else(|| SyntaxError { text: s.to_owned() })
  }
}
