use crate::error::PolycutResult;
use crate::geometry::{nearest_point_on_path, rotate_closed_path, verify_closed};
use crate::types::Point2D;
use tracing::debug;

/// Where a not-yet-attached loop would be spliced.
#[derive(Debug, Clone, Copy)]
struct Splice {
    squared_distance: f64,
    host: usize,
    host_vertex: usize,
    entry_vertex: usize,
}

/// Traversal state of one loop during emission.
struct Frame {
    loop_id: usize,
    vertex: usize,
    next_child: usize,
}

/// Unite closed `paths` into one closed path that visits every vertex of every path.
///
/// The cutting machine cannot leave the material, so disjoint islands are reached by
/// travelling from a vertex of one loop to the nearest vertex of another, cutting the whole
/// second loop and coming back along the same segment. Loops are attached one at a time: the
/// next loop is the one owning the vertex nearest to any vertex of the loops already attached.
/// The whole union is quadratic in the total number of vertices.
///
/// Every input path must be closed within `close_distance`, otherwise
/// [`crate::PolycutError::PathNotClosed`] is returned before any joining happens.
/// No paths give an empty result, a single path is returned unchanged. The result starts and
/// ends at the first vertex of the first non-empty path and each splice adds exactly one point
/// (the re-visited host vertex).
pub fn unite_paths<P: AsRef<[Point2D]>>(
    paths: &[P],
    close_distance: f64,
) -> PolycutResult<Vec<Point2D>> {
    for path in paths {
        verify_closed(path.as_ref(), close_distance)?;
    }

    let mut loops: Vec<Vec<Point2D>> = paths
        .iter()
        .map(|path| path.as_ref())
        .filter(|path| !path.is_empty())
        .map(|path| path.to_vec())
        .collect();

    if loops.len() <= 1 {
        return Ok(loops.pop().unwrap_or_default());
    }

    let splices = attach_loops(&mut loops);
    let union = emit_tour(&loops, &splices);

    debug!(
        loops = loops.len(),
        points = union.len(),
        "united closed paths"
    );

    Ok(union)
}

/// Attach every loop to the tree rooted at loop 0.
///
/// Rotates each attached loop in place so it starts at its entry vertex and returns, for each
/// loop and each of its vertices, the loops spliced right after that vertex in attach order.
fn attach_loops(loops: &mut [Vec<Point2D>]) -> Vec<Vec<Vec<usize>>> {
    let mut splices: Vec<Vec<Vec<usize>>> = loops
        .iter()
        .map(|points| vec![Vec::new(); points.len()])
        .collect();

    let mut best: Vec<Option<Splice>> = vec![None; loops.len()];
    let mut remaining: Vec<usize> = (1..loops.len()).collect();
    update_candidates(loops, 0, &remaining, &mut best);

    while !remaining.is_empty() {
        // Strict comparison: on ties the earliest loop in input order wins.
        let mut chosen: Option<(usize, Splice)> = None;
        for (position, &id) in remaining.iter().enumerate() {
            if let Some(candidate) = best[id] {
                let closer = chosen
                    .map(|(_, current)| candidate.squared_distance < current.squared_distance)
                    .unwrap_or(true);
                if closer {
                    chosen = Some((position, candidate));
                }
            }
        }

        let Some((position, splice)) = chosen else {
            break;
        };
        let id = remaining.remove(position);

        loops[id] = rotate_closed_path(&loops[id], splice.entry_vertex);
        splices[splice.host][splice.host_vertex].push(id);

        update_candidates(loops, id, &remaining, &mut best);
    }

    splices
}

/// Refresh the best splice of every remaining loop against the newly attached `host`.
fn update_candidates(
    loops: &[Vec<Point2D>],
    host: usize,
    remaining: &[usize],
    best: &mut [Option<Splice>],
) {
    for &id in remaining {
        for (entry_vertex, &point) in loops[id].iter().enumerate() {
            let Some((squared_distance, host_vertex)) = nearest_point_on_path(point, &loops[host])
            else {
                continue;
            };
            let closer = best[id]
                .map(|current| squared_distance < current.squared_distance)
                .unwrap_or(true);
            if closer {
                best[id] = Some(Splice {
                    squared_distance,
                    host,
                    host_vertex,
                    entry_vertex,
                });
            }
        }
    }
}

/// Depth-first emission of the attached loops starting from loop 0.
fn emit_tour(loops: &[Vec<Point2D>], splices: &[Vec<Vec<usize>>]) -> Vec<Point2D> {
    let total: usize = loops.iter().map(Vec::len).sum();
    let mut tour = Vec::with_capacity(total + loops.len());

    tour.push(loops[0][0]);
    let mut stack = vec![Frame {
        loop_id: 0,
        vertex: 0,
        next_child: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let children = &splices[frame.loop_id][frame.vertex];
        if let Some(&child) = children.get(frame.next_child) {
            frame.next_child += 1;
            tour.push(loops[child][0]);
            stack.push(Frame {
                loop_id: child,
                vertex: 0,
                next_child: 0,
            });
            continue;
        }

        if frame.vertex + 1 < loops[frame.loop_id].len() {
            frame.vertex += 1;
            frame.next_child = 0;
            tour.push(loops[frame.loop_id][frame.vertex]);
            continue;
        }

        stack.pop();
        // Back on the host loop.
        if let Some(parent) = stack.last() {
            tour.push(loops[parent.loop_id][parent.vertex]);
        }
    }

    tour
}
