//! Lazy extraction of leaf binding identifiers from destructuring patterns
//!
//! `{ a, b: [c], ...rest }` binds `a`, `c`, and `rest`. The iterator walks
//! a pattern with an explicit stack and yields each leaf identifier in
//! document order, on demand. Default-value expressions and computed keys
//! are not binding positions and are never yielded; invalid or
//! expression-valued pattern nodes contribute no leaves.

use swc_ecma_ast::{ArrayPat, BindingIdent, ObjectPat, ObjectPatProp, Pat, RestPat, TsFnParam};

enum Frame<'ast> {
    Pat(&'ast Pat),
    Array(&'ast ArrayPat),
    Object(&'ast ObjectPat),
    Rest(&'ast RestPat),
    Leaf(&'ast BindingIdent),
}

/// Iterator over the leaf binding identifiers of a pattern.
///
/// Finite and non-restartable: once exhausted it stays exhausted.
pub struct PatternLeaves<'ast> {
    stack: Vec<Frame<'ast>>,
}

impl<'ast> PatternLeaves<'ast> {
    pub fn new(pat: &'ast Pat) -> Self {
        Self {
            stack: vec![Frame::Pat(pat)],
        }
    }

    /// Leaves of a body-less signature parameter, which carries its
    /// pattern type directly rather than wrapped in `Pat`.
    pub fn from_fn_param(param: &'ast TsFnParam) -> Self {
        let frame = match param {
            TsFnParam::Ident(ident) => Frame::Leaf(ident),
            TsFnParam::Array(array) => Frame::Array(array),
            TsFnParam::Object(object) => Frame::Object(object),
            TsFnParam::Rest(rest) => Frame::Rest(rest),
        };
        Self { stack: vec![frame] }
    }

    fn push_array(&mut self, array: &'ast ArrayPat) {
        for elem in array.elems.iter().rev().flatten() {
            self.stack.push(Frame::Pat(elem));
        }
    }

    fn push_object(&mut self, object: &'ast ObjectPat) {
        for prop in object.props.iter().rev() {
            match prop {
                ObjectPatProp::KeyValue(kv) => self.stack.push(Frame::Pat(&kv.value)),
                ObjectPatProp::Assign(assign) => self.stack.push(Frame::Leaf(&assign.key)),
                ObjectPatProp::Rest(rest) => self.stack.push(Frame::Pat(&rest.arg)),
            }
        }
    }
}

impl<'ast> Iterator for PatternLeaves<'ast> {
    type Item = &'ast BindingIdent;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Leaf(ident) => return Some(ident),
                Frame::Pat(pat) => match pat {
                    Pat::Ident(ident) => return Some(ident),
                    Pat::Array(array) => self.push_array(array),
                    Pat::Object(object) => self.push_object(object),
                    Pat::Assign(assign) => self.stack.push(Frame::Pat(&assign.left)),
                    Pat::Rest(rest) => self.stack.push(Frame::Pat(&rest.arg)),
                    Pat::Invalid(_) | Pat::Expr(_) => {}
                },
                Frame::Array(array) => self.push_array(array),
                Frame::Object(object) => self.push_object(object),
                Frame::Rest(rest) => self.stack.push(Frame::Pat(&rest.arg)),
            }
        }
        None
    }
}
