use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::LiveTree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for LiveTree {
    fn to_tree_string(&self) -> Tree<String> {
        let Some(root_idx) = self.root() else {
            return Tree::new("Empty tree".to_string());
        };
        let Some(root) = self.get_node(root_idx) else {
            return Tree::new("Empty tree".to_string());
        };
        let mut tree = Tree::new(root.content.to_string());

        fn build_tree(live: &LiveTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = live.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = live.get_node(child_idx) {
                        let mut child_tree = Tree::new(child.content.to_string());
                        build_tree(live, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        build_tree(self, root_idx, &mut tree);
        tree
    }
}
