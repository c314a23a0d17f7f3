mod support;

use claimwise_models::prelude::*;
use claimwise_models::resources::explanation_of_benefit::{Adjudication, Item};
use claimwise_models::visitor::Primitive;
use support::*;

#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl Visitor for EventLog {
    fn visit_start(&mut self, name: &str, index: Option<usize>, node: &dyn Visitable) {
        let index = index.map(|i| format!("[{i}]")).unwrap_or_default();
        self.events.push(format!("start {name}{index} {}", node.type_name()));
    }

    fn visit_end(&mut self, name: &str, _index: Option<usize>, _node: &dyn Visitable) {
        self.events.push(format!("end {name}"));
    }

    fn visit_list_start(&mut self, name: &str, len: usize) {
        self.events.push(format!("list {name} {len}"));
    }

    fn visit_value(&mut self, name: &str, value: Primitive<'_>) {
        if let Primitive::String(s) = value {
            self.events.push(format!("value {name}={s}"));
        }
    }
}

#[test]
fn visits_in_schema_order() {
    let insurance = focal_insurance();
    let mut log = EventLog::default();
    insurance.accept("insurance", Some(0), &mut log);

    assert_eq!(
        log.events,
        vec![
            "start insurance[0] ExplanationOfBenefit.Insurance",
            "start focal boolean",
            "end focal",
            "start coverage Reference",
            "start reference string",
            "value value=Coverage/9876B1",
            "end reference",
            "end coverage",
            "end insurance",
        ]
    );
}

#[test]
fn path_visitor_reports_indexed_paths() {
    let eob = detailed_eob();
    let mut paths = PathVisitor::new();
    eob.accept_root(&mut paths);

    assert_eq!(paths.paths()[0], ("ExplanationOfBenefit".to_string(), "ExplanationOfBenefit"));
    assert_eq!(
        paths.paths_of("ExplanationOfBenefit.Item.Adjudication"),
        vec![
            "ExplanationOfBenefit.item[0].adjudication[0]",
            "ExplanationOfBenefit.item[0].adjudication[1]",
            "ExplanationOfBenefit.item[0].detail[0].adjudication[0]",
        ]
    );
    assert_eq!(
        paths.paths_of("ExplanationOfBenefit.Insurance"),
        vec!["ExplanationOfBenefit.insurance[0]"]
    );
}

#[test]
fn collecting_visitor_finds_nested_nodes() {
    let eob = detailed_eob();

    let mut adjudications = CollectingVisitor::<Adjudication>::new();
    eob.accept_root(&mut adjudications);
    assert_eq!(adjudications.result().len(), 3);

    let mut money = CollectingVisitor::<Money>::new();
    eob.accept_root(&mut money);
    // unitPrice, net and two adjudication amounts on item 0, net and one
    // adjudication on its detail, net on item 1
    assert_eq!(money.into_result().len(), 7);
}

struct SkipItems {
    items_seen: usize,
    references: usize,
}

impl Visitor for SkipItems {
    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        if node.is::<Item>() {
            self.items_seen += 1;
            return false;
        }
        true
    }

    fn visit(&mut self, _name: &str, _index: Option<usize>, node: &dyn Visitable) -> bool {
        if node.is::<Reference>() {
            self.references += 1;
        }
        true
    }
}

#[test]
fn pre_visit_false_prunes_subtree() {
    let eob = detailed_eob();
    let mut visitor = SkipItems { items_seen: 0, references: 0 };
    eob.accept_root(&mut visitor);

    assert_eq!(visitor.items_seen, 2);
    // patient, insurer, provider and insurance coverage; the Location
    // reference inside item 1 is never reached
    assert_eq!(visitor.references, 4);
}

struct Shallow {
    starts: usize,
}

impl Visitor for Shallow {
    fn visit_start(&mut self, _name: &str, _index: Option<usize>, _node: &dyn Visitable) {
        self.starts += 1;
    }

    fn visit(&mut self, _name: &str, _index: Option<usize>, node: &dyn Visitable) -> bool {
        node.is_resource()
    }
}

#[test]
fn visit_false_skips_children_only() {
    let eob = minimal_eob().build().expect("should build");
    let mut visitor = Shallow { starts: 0 };
    eob.accept_root(&mut visitor);

    // the resource plus its populated top-level fields:
    // status, type, use, patient, created, insurer, provider, outcome, insurance[0]
    assert_eq!(visitor.starts, 10);
}
