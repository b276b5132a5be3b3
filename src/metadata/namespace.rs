//! Namespace tree of a module.
//!
//! Metadata stores the namespace of every type as a flat dotted string. Name lookups walk it one
//! segment at a time, so the strings are split into a tree once when the module is opened. Each
//! node lists the top-level (non-nested) `TypeDef` rows declared directly in it.

/// Index of a node in a [`NamespaceTree`]
pub type NamespaceId = usize;

struct NamespaceNode<'a> {
    name: &'a str,
    children: Vec<NamespaceId>,
    types: Vec<u32>,
}

/// The namespaces of a module, rooted at the global namespace.
pub struct NamespaceTree<'a> {
    nodes: Vec<NamespaceNode<'a>>,
}

impl Default for NamespaceTree<'_> {
    fn default() -> Self {
        NamespaceTree {
            nodes: vec![NamespaceNode {
                name: "",
                children: Vec::new(),
                types: Vec::new(),
            }],
        }
    }
}

impl<'a> NamespaceTree<'a> {
    /// The global namespace
    pub const ROOT: NamespaceId = 0;

    /// Add the `TypeDef` row `rid` declared in `namespace`, creating missing nodes on the way
    pub fn insert(&mut self, namespace: &'a str, rid: u32) {
        let mut current = Self::ROOT;

        if !namespace.is_empty() {
            for segment in namespace.split('.') {
                current = match self.child(current, segment) {
                    Some(existing) => existing,
                    None => {
                        let id = self.nodes.len();
                        self.nodes.push(NamespaceNode {
                            name: segment,
                            children: Vec::new(),
                            types: Vec::new(),
                        });
                        self.nodes[current].children.push(id);
                        id
                    }
                };
            }
        }

        self.nodes[current].types.push(rid);
    }

    /// The child of `node` named exactly `segment`
    #[must_use]
    pub fn child(&self, node: NamespaceId, segment: &str) -> Option<NamespaceId> {
        self.nodes.get(node)?.children.iter().copied().find(|child| {
            self.nodes
                .get(*child)
                .is_some_and(|child| child.name == segment)
        })
    }

    /// The top-level `TypeDef` rows declared in `node`, in table order
    #[must_use]
    pub fn types(&self, node: NamespaceId) -> &[u32] {
        self.nodes
            .get(node)
            .map_or(&[], |node| node.types.as_slice())
    }

    /// The simple name of `node`, empty for the global namespace
    #[must_use]
    pub fn name(&self, node: NamespaceId) -> &'a str {
        self.nodes.get(node).map_or("", |node| node.name)
    }

    /// Number of namespaces, including the global one
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, the global namespace exists in every tree
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_walk() {
        let mut tree = NamespaceTree::default();
        tree.insert("", 1);
        tree.insert("Company.Tests", 2);
        tree.insert("Company", 3);
        tree.insert("Company.Tests", 4);
        tree.insert("Company.Other", 5);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.types(NamespaceTree::ROOT), &[1]);

        let company = tree.child(NamespaceTree::ROOT, "Company").unwrap();
        assert_eq!(tree.name(company), "Company");
        assert_eq!(tree.types(company), &[3]);

        let tests = tree.child(company, "Tests").unwrap();
        assert_eq!(tree.types(tests), &[2, 4]);

        assert!(tree.child(company, "tests").is_none());
        assert!(tree.child(NamespaceTree::ROOT, "Tests").is_none());
        assert!(tree.child(NamespaceTree::ROOT, "").is_none());
        assert!(tree.types(99).is_empty());
    }
}
