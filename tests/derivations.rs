//! End-to-end derivations through the public API, following the worked
//! examples of GEB chapters VII–VIII.

use tnt::{Derivation, InvalidStep};

type Steps = Result<(), InvalidStep>;

// Page 188: the excluded middle for p=0, from a tautological premise.
#[test]
fn contrapositive_double_tilde_switcheroo() {
  let mut d = Derivation::new();
  d.fantasy("<p=0⊃~~p=0>", |f| -> Steps {
    f.step("<~~~p=0⊃~p=0>")?; // contrapositive
    f.step("<~p=0⊃~p=0>")?; // double-tilde
    f.step("<p=0∨~p=0>")?; // switcheroo
    Ok(())
  })
  .unwrap();
  assert!(d.is_theorem("<<p=0⊃~~p=0>⊃<p=0∨~p=0>>"));
}

// Pages 189–190: a nested fantasy with carried-over theorems.
#[test]
fn nested_fantasy_with_carry_over() {
  let mut d = Derivation::new();
  d.fantasy("<<p=0⊃q=0>∧<~p=0⊃q=0>>", |f| -> Steps {
    f.step("<p=0⊃q=0>")?; // separation
    f.step("<~q=0⊃~p=0>")?; // contrapositive
    f.step("<~p=0⊃q=0>")?; // separation
    f.step("<~q=0⊃~~p=0>")?; // contrapositive
    f.fantasy("~q=0", |g| -> Steps {
      g.step("~q=0")?; // premise
      g.step("<~q=0⊃~p=0>")?; // carry-over
      g.step("~p=0")?; // detachment
      g.step("<~q=0⊃~~p=0>")?; // carry-over
      g.step("~~p=0")?; // detachment
      g.step("<~p=0∧~~p=0>")?; // joining
      g.step("~<p=0∨~p=0>")?; // De Morgan
      Ok(())
    })?;
    f.step("<~q=0⊃~<p=0∨~p=0>>")?; // fantasy rule
    f.step("<<p=0∨~p=0>⊃q=0>")?; // contrapositive
    f.fantasy("~p=0", |_| {});
    f.step("<~p=0⊃~p=0>")?; // fantasy rule
    f.step("<p=0∨~p=0>")?; // switcheroo
    f.step("q=0")?; // detachment
    Ok(())
  })
  .unwrap();
  assert!(d.is_theorem("<<<p=0⊃q=0>∧<~p=0⊃q=0>>⊃q=0>"));
}

// Page 196: from a contradiction, anything.
#[test]
fn contradiction_implies_anything() {
  let mut d = Derivation::new();
  d.fantasy("<p=0∧~p=0>", |f| -> Steps {
    f.step("p=0")?; // separation
    f.step("~p=0")?; // separation
    f.fantasy("~q=0", |g| -> Steps {
      g.step("p=0")?; // carry-over
      g.step("~~p=0")?; // double-tilde
      Ok(())
    })?;
    f.step("<~q=0⊃~~p=0>")?; // fantasy rule
    f.step("<~p=0⊃q=0>")?; // contrapositive
    f.step("q=0")?; // detachment
    Ok(())
  })
  .unwrap();
  d.step("<<p=0∧~p=0>⊃q=0>").unwrap();
}

// Page 219: one plus one is two.
#[test]
fn one_plus_one_is_two() {
  let mut d = Derivation::new();
  // not derivable before the intermediate steps are replayed
  assert!(d.step("(S0+S0)=SS0").is_err());

  d.step("∀a:∀b:(a+Sb)=S(a+b)").unwrap(); // axiom 3
  d.step("∀b:(S0+Sb)=S(S0+b)").unwrap(); // specification
  d.step("(S0+S0)=S(S0+0)").unwrap(); // specification
  d.step("∀a:(a+0)=a").unwrap(); // axiom 2
  d.step("(S0+0)=S0").unwrap(); // specification
  d.step("S(S0+0)=SS0").unwrap(); // add S
  d.step("(S0+S0)=SS0").unwrap(); // transitivity
  assert_eq!(d.conclusion(), Some("(S0+S0)=SS0"));
}

// Page 219: one times one is one.
#[test]
fn one_times_one_is_one() {
  let mut d = Derivation::new();
  d.step("∀a:∀b:(a⋅Sb)=((a⋅b)+a)").unwrap(); // axiom 5
  d.step("∀b:(S0⋅Sb)=((S0⋅b)+S0)").unwrap(); // specification
  d.step("(S0⋅S0)=((S0⋅0)+S0)").unwrap(); // specification
  d.step("∀a:∀b:(a+Sb)=S(a+b)").unwrap(); // axiom 3
  d.step("∀b:((S0⋅0)+Sb)=S((S0⋅0)+b)").unwrap(); // specification
  d.step("((S0⋅0)+S0)=S((S0⋅0)+0)").unwrap(); // specification
  d.step("∀a:(a+0)=a").unwrap(); // axiom 2
  d.step("((S0⋅0)+0)=(S0⋅0)").unwrap(); // specification
  d.step("∀a:(a⋅0)=0").unwrap(); // axiom 4
  d.step("(S0⋅0)=0").unwrap(); // specification
  d.step("((S0⋅0)+0)=0").unwrap(); // transitivity
  d.step("S((S0⋅0)+0)=S0").unwrap(); // add S
  d.step("((S0⋅0)+S0)=S0").unwrap(); // transitivity
  d.step("(S0⋅S0)=S0").unwrap(); // transitivity
}

// Page 220: the illegal shortcuts.
#[test]
fn symmetry_is_not_primitive_on_universals() {
  let mut d = Derivation::new();
  d.step("∀a:(a+0)=a").unwrap();
  assert!(d.step("∀a:a=(a+0)").is_err());
}

#[test]
fn generalizing_over_the_fantasy_premise_fails() {
  let mut d = Derivation::new();
  d.fantasy("a=0", |f| {
    assert!(f.step("∀a:a=0").is_err());
  });
}

#[test]
fn specification_cannot_capture() {
  let mut d = Derivation::new();
  d.fantasy("∀a:a=a", |f| -> Steps {
    f.step("Sa=Sa")?; // specification
    f.step("∃b:b=Sa")?; // existence
    f.step("∀a:∃b:b=Sa")?; // generalization
    assert!(f.step("∃b:b=Sb").is_err()); // specification, but b is captured
    Ok(())
  })
  .unwrap();
}

// Exercise, page 220: different numbers have different successors.
#[test]
fn different_numbers_have_different_successors() {
  let mut d = Derivation::new();
  d.fantasy("Sa=Sb", |f| f.step("a=b")).unwrap();
  d.step("<Sa=Sb⊃a=b>").unwrap(); // fantasy rule
  d.step("<~a=b⊃~Sa=Sb>").unwrap(); // contrapositive
  d.step("∀b:<~a=b⊃~Sa=Sb>").unwrap(); // generalization
  d.step("∀a:∀b:<~a=b⊃~Sa=Sb>").unwrap(); // generalization
}

// Page 224: ∀a:(0+a)=a needs induction.
#[test]
fn induction_derives_the_left_additive_identity() {
  let mut d = Derivation::new();
  d.step("∀a:∀b:(a+Sb)=S(a+b)").unwrap(); // axiom 3
  d.step("∀b:(0+Sb)=S(0+b)").unwrap(); // specification
  d.step("(0+Sb)=S(0+b)").unwrap(); // specification
  d.fantasy("(0+b)=b", |f| -> Steps {
    f.step("S(0+b)=Sb")?; // add S
    f.step("(0+Sb)=S(0+b)")?; // carry-over
    f.step("(0+Sb)=Sb")?; // transitivity
    Ok(())
  })
  .unwrap();
  d.step("<(0+b)=b⊃(0+Sb)=Sb>").unwrap(); // fantasy rule
  d.step("∀b:<(0+b)=b⊃(0+Sb)=Sb>").unwrap(); // generalization
  d.step("(0+0)=0").unwrap(); // specification of axiom 2
  d.step("∀b:(0+b)=b").unwrap(); // induction
  d.step("(0+a)=a").unwrap(); // specification
  d.step("∀a:(0+a)=a").unwrap(); // generalization
}

#[test]
fn fantasy_inserts_the_implication_verbatim() {
  let mut d = Derivation::new();
  d.fantasy("Sa=Sb", |f| f.step("a=b")).unwrap();
  assert!(d.is_theorem("<Sa=Sb⊃a=b>"));
  assert!(!d.is_theorem("a=b"));
}

#[test]
fn handwave_bypasses_exactly_one_step() {
  let mut d = Derivation::new();
  assert!(d.step("q=0").is_err());
  d.handwave();
  d.step("q=0").unwrap();
  assert!(d.step("r=0").is_err()); // the trapdoor has closed again
  assert_eq!(d.conclusion(), Some("q=0"));
  // but what was handwaved in is now an ordinary theorem
  d.step("Sq=S0").unwrap(); // add S
}
