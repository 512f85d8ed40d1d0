//! Benchmark instruments for the Beamline trajectory engine.
//!
//! - [`reference_instrument`]: focused source, slit and 2-D monitor
//! - [`monitor_stack`]: one source feeding many restoring monitors

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use beamline_components::{EnergyMonitor, PointSource, PsdMonitor, Slit};
use beamline_node::{ComponentError, Node, Placement};
use beamline_random::TargetRect;

fn target(distance: f64, side: f64) -> Result<TargetRect, ComponentError> {
    TargetRect::facing(distance, side, side)
        .ok_or_else(|| ComponentError::invalid("degenerate focus target"))
}

/// Source → slit → 128×128 PSD, all on the z axis.
///
/// # Errors
///
/// Propagates [`ComponentError`] from the component builders; the fixed
/// parameters here are all valid.
pub fn reference_instrument() -> Result<Vec<Node>, ComponentError> {
    let source = PointSource::builder("source")
        .energy(5.0, 15.0)
        .emitter_size(0.001, 0.001)
        .focus(target(2.0, 0.02)?)
        .build()?;
    let slit = Slit::rect("slit", 0.01, 0.005)?;
    let psd = PsdMonitor::builder("psd")
        .size(0.02, 0.02)
        .bins(128, 128)
        .build()?;
    Ok(vec![
        Node::new(source),
        Node::new(slit).at(Placement::at(0.0, 0.0, 2.0)),
        Node::new(psd).at(Placement::at(0.0, 0.0, 3.0)),
    ])
}

/// One source followed by `monitors` energy monitors.
///
/// Every monitor restores the event, so this measures the snapshot and
/// restore overhead of the pipeline.
///
/// # Errors
///
/// Propagates [`ComponentError`] from the component constructors.
pub fn monitor_stack(monitors: usize) -> Result<Vec<Node>, ComponentError> {
    let source = PointSource::builder("source")
        .energy(1.0, 100.0)
        .focus(target(1.0, 0.1)?)
        .build()?;
    let mut nodes = vec![Node::new(source)];
    for i in 0..monitors {
        nodes.push(Node::new(EnergyMonitor::new(
            format!("spectrum{i}"),
            200,
            0.0,
            100.0,
        )?));
    }
    Ok(nodes)
}
