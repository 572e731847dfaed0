//! The core theory: the five axioms seeded into every root derivation.

/// Axioms of Typographical Number Theory.
pub const AXIOMS: [&str; 5] = [
  // zero is not the successor of any number
  "∀a:~Sa=0",
  // zero is the additive identity
  "∀a:(a+0)=a",
  // addition recurses on the successor
  "∀a:∀b:(a+Sb)=S(a+b)",
  // multiplication by zero annihilates
  "∀a:(a⋅0)=0",
  // multiplication recurses on the successor
  "∀a:∀b:(a⋅Sb)=((a⋅b)+a)",
];
