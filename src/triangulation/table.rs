//! Fixed-width pairing table for inspecting a triangulation.

use crate::triangulation::generator::Triangulation;
use crate::triangulation::tetrahedron::FaceSlot;
use std::fmt;

const ID_WIDTH: usize = 11;
const FACE_WIDTH: usize = 23;
const RULE_WIDTH: usize = 112;

impl<I: Copy + fmt::Display> fmt::Display for Triangulation<I> {
    /// One row per tetrahedron, one column per face slot, a rule between chunks.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:^ID_WIDTH$}", "Tetra")?;
        for slot in FaceSlot::ALL {
            write!(f, "|{:^w$}", slot.to_string(), w = FACE_WIDTH + 1)?;
        }
        writeln!(f)?;

        for chunk in self.chunks() {
            writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
            for tet in chunk {
                write!(f, "{:^ID_WIDTH$}", tet.id.to_string())?;
                for face in tet.faces() {
                    let cell = format!("{}{}", face.pairing, face.perm);
                    write!(f, "| {cell:^FACE_WIDTH$}")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
