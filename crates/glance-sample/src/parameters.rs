//! Path-indexed parameter pool.
//!
//! Fit loops drive the engine by adjusting floating-point physical
//! parameters scattered across the sample tree. The pool is a flat,
//! pre-resolved snapshot of every such parameter, built by one depth-first
//! walk before a run and pushed back into the tree with [`ParameterPool::apply`].
//! Nothing in the pool aliases the tree: between `build` and `apply` the
//! tree and the pool are independent, which is what makes the snapshot safe
//! to hand to an optimizer while workers read the tree.
//!
//! Paths take the form `/multilayer/layer0/thickness`: the node names along
//! the walk joined by `/`, with a per-parent counter suffix appended to a
//! node name only when siblings would otherwise collide.

use std::collections::BTreeMap;

use crate::error::SampleError;

/// One named scalar slot exposed by a tree node.
pub struct Parameter<'a> {
    pub name: &'static str,
    pub value: &'a mut f64,
}

impl<'a> Parameter<'a> {
    pub fn new(name: &'static str, value: &'a mut f64) -> Self {
        Self { name, value }
    }
}

/// A node in the sample composition tree.
///
/// Implementors expose their own scalar parameters and their child nodes;
/// the pool derives hierarchical paths from the resulting walk. The walk
/// must be deterministic: `build` and `apply` rely on visiting the same
/// paths in the same order.
pub trait ParameterNode {
    /// Name of this node as rendered into parameter paths.
    fn node_name(&self) -> &str;

    /// The scalar parameters owned directly by this node.
    fn parameters(&mut self) -> Vec<Parameter<'_>>;

    /// Child nodes, in a stable order.
    fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
        Vec::new()
    }
}

/// Depth-first walk over every parameter slot below `node`, invoking
/// `action` with the full path of each slot.
fn walk(node: &mut dyn ParameterNode, node_path: &str, action: &mut dyn FnMut(&str, &mut f64)) {
    for parameter in node.parameters() {
        let path = format!("{}/{}", node_path, parameter.name);
        action(&path, parameter.value);
    }

    // Render child names up front so colliding siblings get stable counter
    // suffixes while unique names stay unadorned.
    let mut name_counts: BTreeMap<String, usize> = BTreeMap::new();
    for child in node.children() {
        *name_counts.entry(child.node_name().to_owned()).or_insert(0) += 1;
    }
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for child in node.children() {
        let name = child.node_name().to_owned();
        let rendered = if name_counts[&name] > 1 {
            let index = seen.entry(name.clone()).or_insert(0);
            let rendered = format!("{}{}", name, *index);
            *index += 1;
            rendered
        } else {
            name
        };
        let child_path = format!("{}/{}", node_path, rendered);
        walk(child, &child_path, action);
    }
}

/// A flat snapshot of every parameter in a sample tree.
///
/// Built fresh before each fit iteration; never mutated concurrently with
/// evaluation.
#[derive(Debug, Clone, Default)]
pub struct ParameterPool {
    values: BTreeMap<String, f64>,
}

impl ParameterPool {
    /// Walk the tree depth-first and snapshot every parameter value.
    ///
    /// # Panics
    ///
    /// Panics if the walk produces the same parameter path twice. That is
    /// a programming error in a node implementation, not a recoverable
    /// input problem.
    pub fn build(root: &mut dyn ParameterNode) -> Self {
        let mut values = BTreeMap::new();
        let root_path = format!("/{}", root.node_name());
        walk(root, &root_path, &mut |path, value| {
            if values.insert(path.to_owned(), *value).is_some() {
                panic!("duplicate parameter registration for path '{path}'");
            }
        });
        log::debug!("parameter pool built with {} entries", values.len());
        ParameterPool { values }
    }

    /// Current value of the parameter at `path`.
    pub fn get(&self, path: &str) -> Result<f64, SampleError> {
        self.values
            .get(path)
            .copied()
            .ok_or_else(|| SampleError::ParameterNotFound(path.to_owned()))
    }

    /// Overwrite the parameter at `path` in the snapshot.
    pub fn set(&mut self, path: &str, value: f64) -> Result<(), SampleError> {
        match self.values.get_mut(path) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SampleError::ParameterNotFound(path.to_owned())),
        }
    }

    /// Push the snapshot values back into the tree.
    ///
    /// Fails if the tree exposes a path the snapshot does not contain,
    /// which means the tree was restructured after `build`.
    pub fn apply(&self, root: &mut dyn ParameterNode) -> Result<(), SampleError> {
        let mut missing: Option<String> = None;
        let root_path = format!("/{}", root.node_name());
        walk(root, &root_path, &mut |path, value| match self.values.get(path) {
            Some(v) => *value = *v,
            None => {
                if missing.is_none() {
                    missing = Some(path.to_owned());
                }
            }
        });
        match missing {
            Some(path) => Err(SampleError::ParameterNotFound(path)),
            None => Ok(()),
        }
    }

    /// All paths in the snapshot, in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of parameters in the snapshot.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Knob {
        name: &'static str,
        value: f64,
    }

    impl ParameterNode for Knob {
        fn node_name(&self) -> &str {
            self.name
        }
        fn parameters(&mut self) -> Vec<Parameter<'_>> {
            vec![Parameter::new("value", &mut self.value)]
        }
    }

    struct Rig {
        knobs: Vec<Knob>,
    }

    impl ParameterNode for Rig {
        fn node_name(&self) -> &str {
            "rig"
        }
        fn parameters(&mut self) -> Vec<Parameter<'_>> {
            Vec::new()
        }
        fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
            self.knobs
                .iter_mut()
                .map(|k| k as &mut dyn ParameterNode)
                .collect()
        }
    }

    #[test]
    fn round_trip_get_set_apply() {
        let mut rig = Rig {
            knobs: vec![
                Knob { name: "gain", value: 1.5 },
                Knob { name: "offset", value: -0.25 },
            ],
        };
        let mut pool = ParameterPool::build(&mut rig);
        assert_eq!(pool.get("/rig/gain/value").unwrap(), 1.5);
        assert_eq!(pool.get("/rig/offset/value").unwrap(), -0.25);

        pool.set("/rig/gain/value", 2.5).unwrap();
        assert_eq!(pool.get("/rig/gain/value").unwrap(), 2.5);

        pool.apply(&mut rig).unwrap();
        assert_eq!(rig.knobs[0].value, 2.5);
    }

    #[test]
    fn colliding_siblings_get_counter_suffixes() {
        let mut rig = Rig {
            knobs: vec![
                Knob { name: "knob", value: 1.0 },
                Knob { name: "knob", value: 2.0 },
                Knob { name: "solo", value: 3.0 },
            ],
        };
        let pool = ParameterPool::build(&mut rig);
        assert_eq!(pool.get("/rig/knob0/value").unwrap(), 1.0);
        assert_eq!(pool.get("/rig/knob1/value").unwrap(), 2.0);
        // unique sibling name stays unsuffixed
        assert_eq!(pool.get("/rig/solo/value").unwrap(), 3.0);
    }

    #[test]
    fn unknown_path_is_reported() {
        let mut rig = Rig { knobs: Vec::new() };
        let mut pool = ParameterPool::build(&mut rig);
        assert!(pool.get("/rig/missing").is_err());
        assert!(pool.set("/rig/missing", 0.0).is_err());
    }

    struct Broken {
        first: f64,
        second: f64,
    }

    impl ParameterNode for Broken {
        fn node_name(&self) -> &str {
            "broken"
        }
        fn parameters(&mut self) -> Vec<Parameter<'_>> {
            // Two distinct slots registered under one name.
            vec![
                Parameter::new("dup", &mut self.first),
                Parameter::new("dup", &mut self.second),
            ]
        }
    }

    #[test]
    #[should_panic(expected = "duplicate parameter registration")]
    fn duplicate_registration_panics() {
        let mut broken = Broken { first: 0.0, second: 1.0 };
        let _ = ParameterPool::build(&mut broken);
    }
}
