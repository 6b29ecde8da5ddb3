//! Static board topology: adjacency and mill lines.
//!
//! Nodes are numbered row by row from the top-left corner of the outer
//! square:
//!
//! ```text
//! 0-----------1-----------2
//! |           |           |
//! |   3-------4-------5   |
//! |   |       |       |   |
//! |   |   6---7---8   |   |
//! |   |   |       |   |   |
//! 9---10--11      12--13--14
//! |   |   |       |   |   |
//! |   |   15--16--17  |   |
//! |   |       |       |   |
//! |   18------19------20  |
//! |           |           |
//! 21----------22----------23
//! ```
//!
//! Corners have two neighbors, outer and inner spoke nodes three, and the
//! spoke nodes of the middle square four.

use crate::constants::{MILLS, NODES};

/// A node index in `0..NODES`.
pub type Node = usize;

/// Neighbors of every node, in ascending order.
pub const ADJACENCY: [&[Node]; NODES] = [
    &[1, 9],          // 0
    &[0, 2, 4],       // 1
    &[1, 14],         // 2
    &[4, 10],         // 3
    &[1, 3, 5, 7],    // 4
    &[4, 13],         // 5
    &[7, 11],         // 6
    &[4, 6, 8],       // 7
    &[7, 12],         // 8
    &[0, 10, 21],     // 9
    &[3, 9, 11, 18],  // 10
    &[6, 10, 15],     // 11
    &[8, 13, 17],     // 12
    &[5, 12, 14, 20], // 13
    &[2, 13, 23],     // 14
    &[11, 16],        // 15
    &[15, 17, 19],    // 16
    &[12, 16],        // 17
    &[10, 19],        // 18
    &[16, 18, 20, 22], // 19
    &[13, 19],        // 20
    &[9, 22],         // 21
    &[19, 21, 23],    // 22
    &[14, 22],        // 23
];

/// All mill lines: eight rows, then eight columns.
pub const MILL_LINES: [[Node; 3]; MILLS] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [9, 10, 11],
    [12, 13, 14],
    [15, 16, 17],
    [18, 19, 20],
    [21, 22, 23],
    [0, 9, 21],
    [3, 10, 18],
    [6, 11, 15],
    [1, 4, 7],
    [16, 19, 22],
    [8, 12, 17],
    [5, 13, 20],
    [2, 14, 23],
];

/// For every node, the two partner pairs completing its row and its column.
///
/// Every node lies on exactly two mill lines.
pub const MILL_PARTNERS: [[[Node; 2]; 2]; NODES] = [
    [[1, 2], [9, 21]],   // 0
    [[0, 2], [4, 7]],    // 1
    [[0, 1], [14, 23]],  // 2
    [[4, 5], [10, 18]],  // 3
    [[3, 5], [1, 7]],    // 4
    [[3, 4], [13, 20]],  // 5
    [[7, 8], [11, 15]],  // 6
    [[6, 8], [1, 4]],    // 7
    [[6, 7], [12, 17]],  // 8
    [[10, 11], [0, 21]], // 9
    [[9, 11], [3, 18]],  // 10
    [[9, 10], [6, 15]],  // 11
    [[13, 14], [8, 17]], // 12
    [[12, 14], [5, 20]], // 13
    [[12, 13], [2, 23]], // 14
    [[16, 17], [6, 11]], // 15
    [[15, 17], [19, 22]], // 16
    [[15, 16], [8, 12]], // 17
    [[19, 20], [3, 10]], // 18
    [[18, 20], [16, 22]], // 19
    [[18, 19], [5, 13]], // 20
    [[22, 23], [0, 9]],  // 21
    [[21, 23], [16, 19]], // 22
    [[21, 22], [2, 14]], // 23
];

/// Neighbors of a node.
#[inline]
pub fn neighbors(node: Node) -> &'static [Node] {
    ADJACENCY[node]
}

/// Whether two nodes are joined by a line segment.
#[inline]
pub fn are_adjacent(a: Node, b: Node) -> bool {
    ADJACENCY[a].contains(&b)
}
