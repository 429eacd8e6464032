//! Algebraic simplification of expressions.
//!
//! The simplifier rebuilds an expression bottom-up and applies
//! language-preserving identities at every node: neutral and absorbing
//! elements of union and concatenation, collapsing of nested stars, and the
//! corresponding ω-identities. The result is a normal form on which no rule
//! applies anywhere, which makes the procedure idempotent. It is invoked as
//! an optional post-processing stage of the synthesis pipeline.

use super::{OmegaRegex, Regex};

/// Simplifies an ω-expression; pure, language-preserving and idempotent.
pub fn simplify(expr: &OmegaRegex) -> OmegaRegex {
    let (_, mut omega) = traverse(Walk::Omega(expr));
    omega.pop().unwrap()
}

/// Simplifies a finite expression; pure, language-preserving and idempotent.
pub fn simplify_regex(expr: &Regex) -> Regex {
    let (mut finite, _) = traverse(Walk::Finite(expr));
    finite.pop().unwrap()
}

enum Walk<'a> {
    Finite(&'a Regex),
    Omega(&'a OmegaRegex),
    Rebuild(Tag),
}

enum Tag {
    Concat,
    Union,
    Star,
    Repeat,
    OmegaConcat,
    OmegaUnion,
}

/// Postorder rebuild with an explicit stack; expression depth exceeds the
/// native call stack.
fn traverse(root: Walk<'_>) -> (Vec<Regex>, Vec<OmegaRegex>) {
    let mut walk = vec![root];
    let mut finite: Vec<Regex> = Vec::new();
    let mut omega: Vec<OmegaRegex> = Vec::new();
    while let Some(step) = walk.pop() {
        match step {
            Walk::Finite(e) => match e {
                Regex::Empty | Regex::Epsilon | Regex::Symbol(_) => finite.push(e.clone()),
                Regex::Concat(l, r) => {
                    walk.push(Walk::Rebuild(Tag::Concat));
                    walk.push(Walk::Finite(r.as_ref()));
                    walk.push(Walk::Finite(l.as_ref()));
                }
                Regex::Union(l, r) => {
                    walk.push(Walk::Rebuild(Tag::Union));
                    walk.push(Walk::Finite(r.as_ref()));
                    walk.push(Walk::Finite(l.as_ref()));
                }
                Regex::Star(inner) => {
                    walk.push(Walk::Rebuild(Tag::Star));
                    walk.push(Walk::Finite(inner.as_ref()));
                }
            },
            Walk::Omega(e) => match e {
                OmegaRegex::Empty => omega.push(OmegaRegex::Empty),
                OmegaRegex::Repeat(inner) => {
                    walk.push(Walk::Rebuild(Tag::Repeat));
                    walk.push(Walk::Finite(inner));
                }
                OmegaRegex::Concat(l, r) => {
                    walk.push(Walk::Rebuild(Tag::OmegaConcat));
                    walk.push(Walk::Omega(r.as_ref()));
                    walk.push(Walk::Finite(l));
                }
                OmegaRegex::Union(l, r) => {
                    walk.push(Walk::Rebuild(Tag::OmegaUnion));
                    walk.push(Walk::Omega(r.as_ref()));
                    walk.push(Walk::Omega(l.as_ref()));
                }
            },
            Walk::Rebuild(tag) => match tag {
                Tag::Concat => {
                    let right = finite.pop().unwrap();
                    let left = finite.pop().unwrap();
                    finite.push(rewrite_concat(left, right));
                }
                Tag::Union => {
                    let right = finite.pop().unwrap();
                    let left = finite.pop().unwrap();
                    finite.push(rewrite_union(left, right));
                }
                Tag::Star => {
                    let inner = finite.pop().unwrap();
                    finite.push(rewrite_star(inner));
                }
                Tag::Repeat => {
                    let inner = finite.pop().unwrap();
                    omega.push(rewrite_repeat(inner));
                }
                Tag::OmegaConcat => {
                    let tail = omega.pop().unwrap();
                    let prefix = finite.pop().unwrap();
                    omega.push(rewrite_omega_concat(prefix, tail));
                }
                Tag::OmegaUnion => {
                    let right = omega.pop().unwrap();
                    let left = omega.pop().unwrap();
                    omega.push(rewrite_omega_union(left, right));
                }
            },
        }
    }
    (finite, omega)
}

fn rewrite_concat(left: Regex, right: Regex) -> Regex {
    if matches!(left, Regex::Empty) || matches!(right, Regex::Empty) {
        return Regex::Empty;
    }
    if matches!(left, Regex::Epsilon) {
        return right;
    }
    if matches!(right, Regex::Epsilon) {
        return left;
    }
    Regex::concat(left, right)
}

fn rewrite_union(left: Regex, right: Regex) -> Regex {
    if matches!(left, Regex::Empty) {
        return right;
    }
    if matches!(right, Regex::Empty) || left == right {
        return left;
    }
    Regex::union(left, right)
}

fn rewrite_star(inner: Regex) -> Regex {
    match &inner {
        Regex::Empty | Regex::Epsilon => Regex::Epsilon,
        // (e*)* = e*
        Regex::Star(_) => inner,
        _ => Regex::star(inner),
    }
}

fn rewrite_repeat(inner: Regex) -> OmegaRegex {
    // ε^ω and ∅^ω contain no infinite word
    if matches!(inner, Regex::Empty | Regex::Epsilon) {
        return OmegaRegex::Empty;
    }
    OmegaRegex::repeat(inner)
}

fn rewrite_omega_concat(prefix: Regex, tail: OmegaRegex) -> OmegaRegex {
    if matches!(prefix, Regex::Empty) || matches!(tail, OmegaRegex::Empty) {
        return OmegaRegex::Empty;
    }
    if matches!(prefix, Regex::Epsilon) {
        return tail;
    }
    OmegaRegex::concat(prefix, tail)
}

fn rewrite_omega_union(left: OmegaRegex, right: OmegaRegex) -> OmegaRegex {
    if matches!(left, OmegaRegex::Empty) {
        return right;
    }
    if matches!(right, OmegaRegex::Empty) || left == right {
        return left;
    }
    OmegaRegex::union(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Regex {
        Regex::symbol(s)
    }

    #[test]
    fn test_neutral_elements() {
        let e = Regex::concat(Regex::Epsilon, sym("a"));
        assert_eq!(simplify_regex(&e), sym("a"));
        let e = Regex::union(Regex::Empty, sym("a"));
        assert_eq!(simplify_regex(&e), sym("a"));
        let e = Regex::concat(sym("a"), Regex::Empty);
        assert_eq!(simplify_regex(&e), Regex::Empty);
    }

    #[test]
    fn test_star_collapse() {
        let e = Regex::star(Regex::star(sym("a")));
        assert_eq!(simplify_regex(&e), Regex::star(sym("a")));
        assert_eq!(simplify_regex(&Regex::star(Regex::Empty)), Regex::Epsilon);
        assert_eq!(simplify_regex(&Regex::star(Regex::Epsilon)), Regex::Epsilon);
    }

    #[test]
    fn test_duplicate_union_branch() {
        let e = Regex::union(sym("a"), Regex::union(sym("a"), sym("b")));
        // inner branches differ, outer duplicates are not adjacent: only
        // structurally equal siblings collapse
        assert_eq!(simplify_regex(&e), e);
        let e = Regex::union(sym("a"), sym("a"));
        assert_eq!(simplify_regex(&e), sym("a"));
    }

    #[test]
    fn test_omega_identities() {
        let o = OmegaRegex::concat(Regex::Epsilon, OmegaRegex::repeat(sym("a")));
        assert_eq!(simplify(&o), OmegaRegex::repeat(sym("a")));

        let o = OmegaRegex::concat(sym("a"), OmegaRegex::repeat(Regex::Empty));
        assert_eq!(simplify(&o), OmegaRegex::Empty);

        let o = OmegaRegex::union(OmegaRegex::Empty, OmegaRegex::repeat(sym("a")));
        assert_eq!(simplify(&o), OmegaRegex::repeat(sym("a")));

        let o = OmegaRegex::union(
            OmegaRegex::repeat(sym("a")),
            OmegaRegex::repeat(sym("a")),
        );
        assert_eq!(simplify(&o), OmegaRegex::repeat(sym("a")));
    }

    #[test]
    fn test_idempotent() {
        let o = OmegaRegex::union(
            OmegaRegex::concat(
                Regex::concat(Regex::Epsilon, Regex::star(Regex::star(sym("a")))),
                OmegaRegex::repeat(Regex::union(Regex::Empty, sym("b"))),
            ),
            OmegaRegex::repeat(Regex::concat(sym("c"), Regex::Epsilon)),
        );
        let once = simplify(&o);
        let twice = simplify(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_preserves_shape_without_redex() {
        let o = OmegaRegex::concat(
            Regex::concat(sym("a"), sym("b")),
            OmegaRegex::repeat(Regex::concat(Regex::star(sym("c")), sym("b"))),
        );
        assert_eq!(simplify(&o), o);
    }
}
