use std::collections::HashSet;

use bitvec::{bitbox, prelude::BitBox};
use tracing::{debug, trace};

use crate::automaton;
use crate::corethy;
use crate::parser;
use crate::types::*;

/// Memoizes formula well-formedness per substring span of one candidate.
/// Spans are pairs of char-boundary indices into `bounds`.
struct WffCache<'a> {
  s: &'a str,
  bounds: Vec<usize>,
  known: BitBox,
  valid: BitBox,
}

impl<'a> WffCache<'a> {
  fn new(s: &'a str) -> Self {
    let mut bounds: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    bounds.push(s.len());
    let n = bounds.len();
    Self { s, bounds, known: bitbox![0; n * n], valid: bitbox![0; n * n] }
  }

  fn len(&self) -> usize {
    self.bounds.len() - 1
  }

  fn slice(&self, i: usize, j: usize) -> &'a str {
    &self.s[self.bounds[i]..self.bounds[j]]
  }

  fn is_wff(&mut self, i: usize, j: usize) -> bool {
    let idx = i * self.bounds.len() + j;
    if !self.known[idx] {
      let ok = automaton::formula_info(self.slice(i, j)).is_some();
      self.known.set(idx, true);
      self.valid.set(idx, ok);
    }
    self.valid[idx]
  }
}

/// `f` with every free occurrence of `v` replaced by `t`. Used only
/// where `v` cannot occur bound in `f`, so no occurrence is skipped.
fn subst_free(f: &Formula, v: VarName, t: &Term) -> Formula {
  match *f {
    Formula::Atom(ref t1, ref t2) => {
      Formula::Atom(subst_term(t1, v, t), subst_term(t2, v, t))
    }
    Formula::Not(ref g) => Formula::Not(Box::new(subst_free(g, v, t))),
    Formula::Bin(op, ref f1, ref f2) => Formula::Bin(
      op,
      Box::new(subst_free(f1, v, t)),
      Box::new(subst_free(f2, v, t)),
    ),
    Formula::Quantified(q, w, ref g) => {
      Formula::Quantified(q, w, Box::new(subst_free(g, v, t)))
    }
  }
}

fn subst_term(u: &Term, v: VarName, t: &Term) -> Term {
  match *u {
    Term::Num { .. } => u.clone(),
    Term::Var { succs, name } => {
      if name == v { t.add_succs(succs) } else { u.clone() }
    }
    Term::Pair { succs, op, ref lhs, ref rhs } => Term::Pair {
      succs,
      op,
      lhs: Box::new(subst_term(lhs, v, t)),
      rhs: Box::new(subst_term(rhs, v, t)),
    },
  }
}

/// Lock-step descent deciding whether `b` arises from `a` by replacing
/// every free occurrence of `v` with one fixed term, accumulated in
/// `witness`.
fn match_subst(a: &Formula, b: &Formula, v: VarName, witness: &mut Option<Term>) -> bool {
  match (a, b) {
    (&Formula::Atom(ref a1, ref a2), &Formula::Atom(ref b1, ref b2)) => {
      match_subst_term(a1, b1, v, witness) && match_subst_term(a2, b2, v, witness)
    }
    (&Formula::Not(ref a1), &Formula::Not(ref b1)) => match_subst(a1, b1, v, witness),
    (&Formula::Bin(opa, ref a1, ref a2), &Formula::Bin(opb, ref b1, ref b2)) => {
      opa == opb && match_subst(a1, b1, v, witness) && match_subst(a2, b2, v, witness)
    }
    (&Formula::Quantified(qa, va, ref a1), &Formula::Quantified(qb, vb, ref b1)) => {
      qa == qb && va == vb && match_subst(a1, b1, v, witness)
    }
    _ => false,
  }
}

fn match_subst_term(a: &Term, b: &Term, v: VarName, witness: &mut Option<Term>) -> bool {
  if let Term::Var { succs, name } = *a {
    if name == v {
      // `b` must be S^succs applied to the one witness term
      return match b.strip_succs(succs) {
        Some(t) => match witness {
          Some(w) => *w == t,
          None => {
            *witness = Some(t);
            true
          }
        },
        None => false,
      }
    }
  }
  match (a, b) {
    (&Term::Num { succs: n1 }, &Term::Num { succs: n2 }) => n1 == n2,
    (&Term::Var { succs: n1, name: v1 }, &Term::Var { succs: n2, name: v2 }) => {
      n1 == n2 && v1 == v2
    }
    (
      &Term::Pair { succs: n1, op: op1, lhs: ref l1, rhs: ref r1 },
      &Term::Pair { succs: n2, op: op2, lhs: ref l2, rhs: ref r2 },
    ) => {
      n1 == n2
        && op1 == op2
        && match_subst_term(l1, l2, v, witness)
        && match_subst_term(r1, r2, v, witness)
    }
    _ => false,
  }
}

/// The Specification/Existence witness check: `b = a[v := t]` for a
/// single term `t` containing no variable quantified anywhere in `a`.
fn is_term_substitution(v: VarName, a: &Formula, a_quantified: &VarSet, b: &Formula) -> bool {
  let mut witness = None;
  if !match_subst(a, b, v, &mut witness) { return false }
  match witness {
    Some(t) => t.variables().is_disjoint(a_quantified),
    None => true,
  }
}

/// Splits `∀v:X` or `∃v:X` into `(v, X)` on the rendered text. Returns
/// `None` when the prefix or the variable is not there (a theorem
/// inserted by handwaving can be any string at all).
fn split_quantified(s: &str, q: char) -> Option<(VarName, &str)> {
  let rest = s.strip_prefix(q)?;
  let colon = rest.find(':')?;
  let v = VarName::parse(&rest[..colon])?;
  Some((v, &rest[colon + 1..]))
}

/// The rule that justified a step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rule {
  /// Already in the theorem set.
  Theorem,
  Joining,
  Separation,
  DoubleTilde,
  Detachment,
  Contrapositive,
  DeMorgans,
  Switcheroo,
  Specification,
  Generalization,
  Interchange,
  Existence,
  Equality,
  Successorship,
  Induction,
}

/// A growing set of proven theorems. Root derivations start from the
/// five axioms; a fantasy opens a child derivation on a copy of the
/// parent's theorems plus one premise.
#[derive(Debug, Clone)]
pub struct Derivation {
  theorems: HashSet<String>,
  premise: Option<String>,
  conclusion: Option<String>,
  handwaving: bool,
}

impl Default for Derivation {
  fn default() -> Self {
    Self::new()
  }
}

impl Derivation {
  pub fn new() -> Self {
    Self {
      theorems: corethy::AXIOMS.iter().map(|&s| s.to_owned()).collect(),
      premise: None,
      conclusion: None,
      handwaving: false,
    }
  }

  fn fantasy_setup(premise: String, mut theorems: HashSet<String>) -> Self {
    theorems.insert(premise.clone());
    Self {
      theorems,
      conclusion: Some(premise.clone()),
      premise: Some(premise),
      handwaving: false,
    }
  }

  pub fn theorems(&self) -> impl Iterator<Item = &str> {
    self.theorems.iter().map(|s| s.as_str())
  }

  pub fn is_theorem(&self, s: &str) -> bool {
    self.theorems.contains(s)
  }

  /// The last successfully added theorem.
  pub fn conclusion(&self) -> Option<&str> {
    self.conclusion.as_deref()
  }

  /// The fantasy premise, inside a fantasy.
  pub fn premise(&self) -> Option<&str> {
    self.premise.as_deref()
  }

  fn valid_by_joining(&self, s: &str) -> bool {
    if !(s.starts_with('<') && s.ends_with('>')) { return false }
    for (i, c) in s.char_indices() {
      if c == '∧'
        && self.theorems.contains(&s[1..i])
        && self.theorems.contains(&s[i + c.len_utf8()..s.len() - 1])
      {
        return true
      }
    }
    false
  }

  fn valid_by_separation(&self, s: &str) -> bool {
    if automaton::formula_info(s).is_none() { return false }
    let head = format!("<{}∧", s);
    let tail = format!("∧{}>", s);
    self.theorems.iter().any(|theorem| {
      theorem.starts_with('<')
        && theorem.ends_with('>')
        && (theorem.starts_with(&head) || theorem.ends_with(&tail))
    })
  }

  fn valid_by_double_tilde(&self, s: &str) -> bool {
    if automaton::formula_info(s).is_none() { return false }
    self.theorems.iter().any(|theorem| {
      is_removal_of_double_tilde(s, theorem) || is_removal_of_double_tilde(theorem, s)
    })
  }

  fn valid_by_detachment(&self, s: &str) -> bool {
    self
      .theorems
      .iter()
      .any(|theorem| self.theorems.contains(&format!("<{}⊃{}>", theorem, s)))
  }

  /// The unconstrained two-hole witness search: every substring pair
  /// (x, y) that is a pair of well-formed formulas instantiates schema
  /// `a`; wherever that instance occurs in `s`, splicing in the `b`
  /// instance must hit an existing theorem.
  fn valid_by_substituting(
    &self,
    s: &str,
    a: fn(&str, &str) -> String,
    b: fn(&str, &str) -> String,
  ) -> bool {
    let mut cache = WffCache::new(s);
    let n = cache.len();
    for xi in 0..n {
      for xj in xi + 1..=n {
        if !cache.is_wff(xi, xj) { continue }
        for yi in 0..n {
          for yj in yi + 1..=n {
            if !cache.is_wff(yi, yj) { continue }
            let first = a(cache.slice(xi, xj), cache.slice(yi, yj));
            if first.len() > s.len() { continue }
            let second = b(cache.slice(xi, xj), cache.slice(yi, yj));
            let mut from = 0;
            while let Some(off) = s[from..].find(&first) {
              let i = from + off;
              let mut candidate = String::with_capacity(s.len() + second.len());
              candidate.push_str(&s[..i]);
              candidate.push_str(&second);
              candidate.push_str(&s[i + first.len()..]);
              if self.theorems.contains(&candidate) { return true }
              from = i + 1;
              while !s.is_char_boundary(from) {
                from += 1
              }
            }
          }
        }
      }
    }
    false
  }

  fn valid_by_interchanging(
    &self,
    s: &str,
    a: fn(&str, &str) -> String,
    b: fn(&str, &str) -> String,
  ) -> bool {
    self.valid_by_substituting(s, a, b) || self.valid_by_substituting(s, b, a)
  }

  fn valid_by_contrapositive(&self, s: &str) -> bool {
    self.valid_by_interchanging(
      s,
      |x, y| format!("<{}⊃{}>", x, y),
      |x, y| format!("<~{}⊃~{}>", y, x),
    )
  }

  fn valid_by_de_morgans(&self, s: &str) -> bool {
    self.valid_by_interchanging(
      s,
      |x, y| format!("<~{}∧~{}>", x, y),
      |x, y| format!("~<{}∨{}>", x, y),
    )
  }

  fn valid_by_switcheroo(&self, s: &str) -> bool {
    self.valid_by_interchanging(
      s,
      |x, y| format!("<{}∨{}>", x, y),
      |x, y| format!("<~{}⊃{}>", x, y),
    )
  }

  fn valid_by_specification(&self, s: &str) -> bool {
    let cand = match parser::parse_formula(s) {
      Some(f) => f,
      None => return false,
    };
    for theorem in &self.theorems {
      if let Some((v, body_text)) = split_quantified(theorem, '∀') {
        if let Some(body) = parser::parse_formula(body_text) {
          if is_term_substitution(v, &body, &body.info().quantified, &cand) {
            return true
          }
        }
      }
    }
    false
  }

  fn valid_by_generalization(&self, s: &str) -> bool {
    if let Some((v, body)) = split_quantified(s, '∀') {
      if let Some(info) = automaton::formula_info(body) {
        if info.free.contains(&v) {
          // a hypothesis cannot be generalized over
          if let Some(premise) = &self.premise {
            let captured = automaton::formula_info(premise)
              .map_or(false, |info| info.free.contains(&v));
            if captured { return false }
          }
          return self.theorems.contains(body)
        }
      }
    }
    false
  }

  fn valid_by_interchange(&self, s: &str) -> bool {
    self
      .theorems
      .iter()
      .any(|theorem| theorem.len() == s.len() && interchange_matches(s, theorem))
  }

  fn valid_by_existence(&self, s: &str) -> bool {
    if let Some((v, body_text)) = split_quantified(s, '∃') {
      if let Some(body) = parser::parse_formula(body_text) {
        let info = body.info();
        if info.free.contains(&v) {
          return self.theorems.iter().any(|theorem| {
            parser::parse_formula(theorem)
              .map_or(false, |thm| is_term_substitution(v, &body, &info.quantified, &thm))
          })
        }
      }
    }
    false
  }

  fn valid_by_equality(&self, s: &str) -> bool {
    let eq = match s.find('=') {
      Some(i) if i > 0 => i,
      _ => return false,
    };
    let (first, second) = (&s[..eq], &s[eq + 1..]);
    if parser::is_term(first)
      && parser::is_term(second)
      && self.theorems.contains(&format!("{}={}", second, first))
    {
      return true // symmetry
    }
    let prefix = format!("{}=", first);
    self.theorems.iter().any(|theorem| {
      theorem
        .strip_prefix(&prefix)
        .map_or(false, |middle| self.theorems.contains(&format!("{}={}", middle, second)))
    }) // transitivity
  }

  fn valid_by_successorship(&self, s: &str) -> bool {
    let eq = match s.find('=') {
      Some(i) if i > 0 => i,
      _ => return false,
    };
    let (first, second) = (&s[..eq], &s[eq + 1..]);
    if !(parser::is_term(first) && parser::is_term(second)) { return false }
    if self.theorems.contains(&format!("S{}=S{}", first, second)) {
      return true // add S to both sides
    }
    first.starts_with('S')
      && second.starts_with('S')
      && self.theorems.contains(&format!("{}={}", &first[1..], &second[1..]))
    // drop S from both sides
  }

  fn valid_by_induction(&self, s: &str) -> bool {
    if automaton::formula_info(s).is_none() { return false }
    let (v, body_text) = match split_quantified(s, '∀') {
      Some(x) => x,
      None => return false,
    };
    let body = match parser::parse_formula(body_text) {
      Some(f) => f,
      None => return false,
    };
    let base = subst_free(&body, v, &Term::Num { succs: 0 });
    if !self.theorems.contains(&base.to_string()) { return false }
    let bumped = subst_free(&body, v, &Term::Var { succs: 1, name: v });
    let inductive = format!("∀{}:<{}⊃{}>", v, body_text, bumped);
    self.theorems.contains(&inductive)
  }

  /// The rule justifying `s` as a new theorem, if any. Rules are tried
  /// in a fixed order; the first acceptance wins.
  pub fn justification(&self, s: &str) -> Option<Rule> {
    if self.theorems.contains(s) { return Some(Rule::Theorem) }
    if self.valid_by_joining(s) { return Some(Rule::Joining) }
    if self.valid_by_separation(s) { return Some(Rule::Separation) }
    if self.valid_by_double_tilde(s) { return Some(Rule::DoubleTilde) }
    if self.valid_by_detachment(s) { return Some(Rule::Detachment) }
    if self.valid_by_contrapositive(s) { return Some(Rule::Contrapositive) }
    if self.valid_by_de_morgans(s) { return Some(Rule::DeMorgans) }
    if self.valid_by_switcheroo(s) { return Some(Rule::Switcheroo) }
    if self.valid_by_specification(s) { return Some(Rule::Specification) }
    if self.valid_by_generalization(s) { return Some(Rule::Generalization) }
    if self.valid_by_interchange(s) { return Some(Rule::Interchange) }
    if self.valid_by_existence(s) { return Some(Rule::Existence) }
    if self.valid_by_equality(s) { return Some(Rule::Equality) }
    if self.valid_by_successorship(s) { return Some(Rule::Successorship) }
    if self.valid_by_induction(s) { return Some(Rule::Induction) }
    None
  }

  pub fn is_valid_new_theorem(&self, s: &str) -> bool {
    self.justification(s).is_some()
  }

  /// Accepts the next step unconditionally; consumed by that step.
  pub fn handwave(&mut self) {
    trace!("handwaving the next step");
    self.handwaving = true
  }

  /// Adds `s` to the theorem set if some rule (or an armed handwave)
  /// justifies it; otherwise changes nothing.
  pub fn step(&mut self, s: &str) -> Result<(), InvalidStep> {
    if self.handwaving {
      debug!(step = s, "step accepted by handwave");
    } else {
      match self.justification(s) {
        Some(rule) => debug!(step = s, rule = ?rule, "step accepted"),
        None => {
          trace!(step = s, "step rejected");
          return Err(InvalidStep { text: s.to_owned() })
        }
      }
    }
    self.handwaving = false;
    self.theorems.insert(s.to_owned());
    self.conclusion = Some(s.to_owned());
    Ok(())
  }

  /// Runs `f` on a child derivation holding a copy of this derivation's
  /// theorems plus `premise`. When `f` returns, `<premise⊃conclusion>`
  /// is added here unconditionally — a fantasy with no steps yields
  /// `<P⊃P>` — and `f`'s result is passed through.
  pub fn fantasy<R>(&mut self, premise: &str, f: impl FnOnce(&mut Derivation) -> R) -> R {
    trace!(premise, "fantasy opened");
    let mut child = Derivation::fantasy_setup(premise.to_owned(), self.theorems.clone());
    let r = f(&mut child);
    let conclusion = child.conclusion.unwrap_or_else(|| premise.to_owned());
    let implication = format!("<{}⊃{}>", premise, conclusion);
    trace!(theorem = implication.as_str(), "fantasy closed");
    self.theorems.insert(implication.clone());
    self.conclusion = Some(implication);
    r
  }
}

fn is_removal_of_double_tilde(shorter: &str, longer: &str) -> bool {
  if shorter.len() + 2 != longer.len() { return false }
  let (sb, lb) = (shorter.as_bytes(), longer.as_bytes());
  for (i, _) in shorter.char_indices() {
    if lb[..i] == sb[..i] && lb[i..].starts_with(b"~~") && lb[i + 2..] == sb[i..] {
      return true
    }
  }
  false
}

/// One `∀v:` prefix swapped for `~∃v:~` (or back) at a single position,
/// the text identical everywhere else. Works on raw bytes; `∀` and `~∃`
/// take the same space, so the swap is length-preserving.
fn interchange_matches(s: &str, theorem: &str) -> bool {
  let (sb, tb) = (s.as_bytes(), theorem.as_bytes());
  let mut from = 0;
  while let Some(off) = theorem[from..].find('∀') {
    let a = from + off;
    if sb[..a] != tb[..a] { break }
    if s[a..].starts_with("~∃") {
      if let Some(coff) = theorem[a + 3..].find(':') {
        let colon = a + 3 + coff;
        if parser::is_variable(&theorem[a + 3..colon]) && tb.get(colon + 1) == Some(&b'~') {
          let mut candidate = String::with_capacity(s.len());
          candidate.push_str(&theorem[..a]);
          candidate.push_str("~∃");
          candidate.push_str(&theorem[a + 3..colon]);
          candidate.push(':');
          candidate.push_str(&theorem[colon + 2..]);
          if s == candidate { return true }
        }
      }
    }
    from = a + '∀'.len_utf8();
  }
  let mut from = 0;
  while let Some(off) = theorem[from..].find("~∃") {
    let ne = from + off;
    if sb[..ne] != tb[..ne] { break }
    if s[ne..].starts_with('∀') {
      if let Some(coff) = theorem[ne + 4..].find(':') {
        let colon = ne + 4 + coff;
        if parser::is_variable(&theorem[ne + 4..colon]) {
          let mut candidate = String::with_capacity(s.len());
          candidate.push_str(&theorem[..ne]);
          candidate.push('∀');
          candidate.push_str(&theorem[ne + 4..colon]);
          candidate.push_str(":~");
          candidate.push_str(&theorem[colon + 1..]);
          if s == candidate { return true }
        }
      }
    }
    from = ne + "~∃".len();
  }
  false
}
