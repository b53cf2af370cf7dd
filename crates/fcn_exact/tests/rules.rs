//! Technology rules and border I/O pruning, checked on finished layouts.

use fcn_config::Technology;
use fcn_diagnostics::DiagnosticSink;
use fcn_exact::{exact, AspectRatioIter, ExactOutcome, ExactParams, ShapeProbe, SolveOutcome};
use fcn_layout::{
    simulate_layout, verify_layout, Direction, ElementFunction, GateLayout, Topology,
};
use fcn_network::{blueprints, truth_tables, LogicNetwork};

fn area(outcome: &ExactOutcome<GateLayout>) -> u64 {
    u64::from(outcome.stats.x_size) * u64::from(outcome.stats.y_size)
}

fn assert_equivalent(ntk: &LogicNetwork, layout: &GateLayout) {
    assert!(verify_layout(layout).is_empty());
    for (row, outputs) in truth_tables(ntk).unwrap().iter().enumerate() {
        let inputs: Vec<bool> = (0..ntk.num_pis()).map(|i| (row >> i) & 1 != 0).collect();
        assert_eq!(&simulate_layout(layout, &inputs).unwrap(), outputs);
    }
}

/// An AND whose second operand is also an output, so it fans out.
fn and_with_tap() -> LogicNetwork {
    let mut ntk = LogicNetwork::new();
    let a = ntk.create_pi("a");
    let b = ntk.create_pi("b");
    let f = ntk.create_and(a, b);
    ntk.create_po(f, "f");
    ntk.create_po(b, "b");
    ntk
}

/// Fan-outs are wire elements with more than one consumer.
fn is_fanout(layout: &GateLayout, t: fcn_layout::Tile) -> bool {
    layout
        .element(t)
        .is_some_and(|e| e.is_wire() && layout.consumers(t).len() > 1)
}

fn is_and_or_maj(layout: &GateLayout, t: fcn_layout::Tile) -> bool {
    matches!(
        layout.element(t).map(|e| e.function),
        Some(ElementFunction::Logic(kind)) if kind.is_and_or_maj()
    )
}

#[test]
fn topolinano_layouts_follow_the_cell_library() {
    let params = ExactParams {
        scheme: "COLUMNAR".into(),
        topology: Topology::ShiftedCartesian,
        technology: Technology::Topolinano,
        ..Default::default()
    };
    for ntk in [and_with_tap(), blueprints::and_network()] {
        let sink = DiagnosticSink::new();
        let outcome = exact::<GateLayout>(&ntk, &params, &sink).unwrap();
        assert!(!sink.has_errors());
        assert!(!sink.diagnostics().iter().any(|d| d.code.to_string() == "W005"));
        let layout = outcome.layout.unwrap();
        let topo = layout.topology();
        let mut fanouts = 0;
        for (t, element) in layout.elements() {
            let consumers = layout.consumers(t);
            if is_fanout(&layout, t) {
                fanouts += 1;
                let from = element.inputs[0].tile().unwrap();
                assert_eq!(topo.direction_to(t, from), Some(Direction::NorthWest), "{t}");
            } else if is_and_or_maj(&layout, t) {
                for &c in &consumers {
                    assert_eq!(topo.direction_to(t, c), Some(Direction::NorthEast), "{t}");
                }
            } else {
                continue;
            }
            // a wire or a pin separates them from the next cell
            for &c in &consumers {
                assert!(!is_fanout(&layout, c) && !is_and_or_maj(&layout, c), "{t} -> {c}");
            }
        }
        if ntk.num_pos() == 2 {
            assert_eq!(fanouts, 1);
        }
        assert_eq!(layout.num_gates(), 1);
        assert_equivalent(&ntk, &layout);
    }
}

#[test]
fn topolinano_never_beats_the_unrestricted_run() {
    let ntk = and_with_tap();
    let plain = ExactParams {
        scheme: "COLUMNAR".into(),
        topology: Topology::ShiftedCartesian,
        ..Default::default()
    };
    let restricted = ExactParams {
        technology: Technology::Topolinano,
        ..plain.clone()
    };
    let sink = DiagnosticSink::new();
    let free = exact::<GateLayout>(&ntk, &plain, &sink).unwrap();
    let bound = exact::<GateLayout>(&ntk, &restricted, &sink).unwrap();
    assert!(area(&free) <= area(&bound));
    assert_equivalent(&ntk, free.layout.as_ref().unwrap());
}

/// Returns the first satisfiable shape in enumeration order, up to `max_area`.
fn first_placeable(probe: &ShapeProbe, max_area: u64) -> Option<u64> {
    AspectRatioIter::new(probe.lower_bound())
        .take_while(|ar| ar.area() <= max_area)
        .find(|&ar| probe.check_fresh(ar).unwrap() == SolveOutcome::Sat)
        .map(|ar| ar.area())
}

#[test]
fn border_io_pruning_keeps_the_minimum_area() {
    let networks = [
        blueprints::and_network(),
        blueprints::unbalanced_and_inv(),
        blueprints::inverter_network(),
    ];
    for scheme in ["2DDWAVE", "COLUMNAR", "ROW"] {
        let params = ExactParams {
            scheme: scheme.into(),
            border_io: true,
            ..Default::default()
        };
        for ntk in &networks {
            let pruned = ShapeProbe::new(ntk, &params).unwrap();
            let unpruned = ShapeProbe::new(ntk, &params).unwrap().without_hierarchy();
            let expected = first_placeable(&unpruned, 24);
            assert!(expected.is_some(), "{scheme}: nothing up to 24 tiles");
            assert_eq!(first_placeable(&pruned, 24), expected, "{scheme}");

            let sink = DiagnosticSink::new();
            let outcome = exact::<GateLayout>(ntk, &params, &sink).unwrap();
            assert_eq!(Some(area(&outcome)), expected, "{scheme}");
            let layout = outcome.layout.unwrap();
            let ar = layout.aspect_ratio();
            for (t, element) in layout.elements() {
                if element.is_pin() {
                    assert!(
                        t.x == 0 || t.y == 0 || t.x == ar.max_x() || t.y == ar.max_y(),
                        "{scheme}: pin inside at {t}"
                    );
                }
            }
            assert_equivalent(ntk, &layout);
        }
    }
}
