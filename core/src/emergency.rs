//! Emergency ascent used to size tank reserves.

use tracing::trace;

use crate::buhlmann::{DecompressionPlanner, RestingParameters};
use crate::error::PlanError;
use crate::options::Options;
use crate::segment::{Segment, Segments};
use crate::tank::{self, Tank};
use crate::time;

/// Depth tolerance in meters when looking for the deepest part of the profile.
const DEPTH_TOLERANCE: f64 = 1e-3;

/// Ascent after a problem at the end of the deepest part of the dive.
///
/// Starts with a flat problem solving segment breathing the bottom gas from the
/// bottom tank, followed by the ascent planned with all gases carried in
/// `tanks`. The result always contains at least one segment.
pub fn emergency_ascent<P: DecompressionPlanner + ?Sized>(
    planner: &P,
    segments: &[Segment],
    options: &Options,
    tanks: &[Tank],
    surface_interval: Option<&RestingParameters>,
) -> Result<Vec<Segment>, PlanError> {
    let deepest = deepest_part_end(segments).ok_or(PlanError::TooFewSegments {
        required: 1,
        got: 0,
    })?;

    let mut cut = Segments::from_vec(segments[..=deepest].to_vec());
    let bottom = &segments[deepest];
    let problem_solving = Segment::new(
        bottom.end_depth,
        bottom.end_depth,
        bottom.gas,
        time::to_seconds(options.problem_solving_duration),
    );
    cut.push(match bottom.tank {
        Some(index) => problem_solving.with_tank(index),
        None => problem_solving,
    });

    let gases = tank::to_gases(tanks);
    let profile = planner.decompression(&cut, &gases, options, surface_interval)?;
    let ascent = profile.segments[deepest + 1..].to_vec();
    trace!(
        depth = bottom.end_depth,
        segments = ascent.len(),
        "emergency ascent"
    );

    if ascent.is_empty() {
        return Err(PlanError::EmptyEmergencyAscent);
    }

    Ok(ascent)
}

/// Index of the last segment ending at the maximum depth of the profile.
fn deepest_part_end(segments: &[Segment]) -> Option<usize> {
    let max_depth = crate::segment::max_depth(segments);
    segments
        .iter()
        .rposition(|s| s.end_depth >= max_depth - DEPTH_TOLERANCE)
        .or_else(|| segments.len().checked_sub(1))
}
