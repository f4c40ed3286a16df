use rdf_paths_model::{NamedNode, Triple};

mod memory;

fn ex(name: &str) -> NamedNode {
    NamedNode::new(format!("http://example.com/{name}")).unwrap()
}

fn triple(subject: &str, predicate: &str, object: &str) -> Triple {
    Triple::new(ex(subject), ex(predicate), ex(object))
}
