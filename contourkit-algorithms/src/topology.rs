//! Edge connectivity of a triangle mesh

use std::collections::HashMap;

/// Unique undirected edges of a mesh and their incidence with faces
#[derive(Debug, Clone, Default)]
pub struct EdgeTopology {
    /// Edges as vertex pairs with `a < b`
    pub edges: Vec<[usize; 2]>,
    /// For each face, the edges `(v0,v1)`, `(v1,v2)`, `(v2,v0)` as indices into `edges`
    pub face_edges: Vec<[usize; 3]>,
    /// Faces incident to each edge
    pub edge_faces: Vec<Vec<usize>>,
}

impl EdgeTopology {
    /// Build edge connectivity from faces
    pub fn build(faces: &[[usize; 3]]) -> Self {
        let mut index: HashMap<(usize, usize), usize> = HashMap::with_capacity(faces.len() * 3 / 2);
        let mut edges = Vec::new();
        let mut edge_faces: Vec<Vec<usize>> = Vec::new();
        let mut face_edges = Vec::with_capacity(faces.len());

        for (fi, face) in faces.iter().enumerate() {
            let mut fe = [0usize; 3];
            for j in 0..3 {
                let (a, b) = (face[j], face[(j + 1) % 3]);
                let key = (a.min(b), a.max(b));
                let ei = *index.entry(key).or_insert_with(|| {
                    edges.push([key.0, key.1]);
                    edge_faces.push(Vec::with_capacity(2));
                    edges.len() - 1
                });
                if !edge_faces[ei].contains(&fi) {
                    edge_faces[ei].push(fi);
                }
                fe[j] = ei;
            }
            face_edges.push(fe);
        }

        Self {
            edges,
            face_edges,
            edge_faces,
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges with exactly one incident face
    pub fn boundary_edges(&self) -> impl Iterator<Item = usize> + '_ {
        self.edge_faces
            .iter()
            .enumerate()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(e, _)| e)
    }

    /// Whether every edge is shared by exactly two faces
    pub fn is_closed(&self) -> bool {
        self.edge_faces.iter().all(|faces| faces.len() == 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_triangles_share_one_edge() {
        let topo = EdgeTopology::build(&[[0, 1, 2], [2, 1, 3]]);
        assert_eq!(topo.edge_count(), 5);
        let shared = topo.face_edges[0][1];
        assert_eq!(topo.edges[shared], [1, 2]);
        assert_eq!(topo.edge_faces[shared], vec![0, 1]);
        assert_eq!(topo.boundary_edges().count(), 4);
        assert!(!topo.is_closed());
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let topo = EdgeTopology::build(&[[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]]);
        assert_eq!(topo.edge_count(), 6);
        assert!(topo.is_closed());
        assert_eq!(topo.boundary_edges().count(), 0);
    }
}
