#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod model {
    pub use rdf_paths_model::*;
}

pub mod common {
    pub use rdf_paths_common::*;
}

pub mod automaton {
    pub use rdf_paths_automaton::*;
}

pub mod engine {
    pub use rdf_paths_engine::*;
}

pub mod storage {
    pub use rdf_paths_storage::*;
}
