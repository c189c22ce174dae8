pub mod octahedron;

pub use octahedron::{edges, Octahedron, EDGE_INDICES, VERTEX_COUNT};
