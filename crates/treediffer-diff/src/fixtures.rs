//! Sample nodes and trees shared by the unit tests.

use serde_json::{json, Value};
use treediffer_types::Node;

pub fn obj(value: Value) -> Node {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {other}"),
    }
}

pub fn sample_children() -> Vec<Value> {
    vec![
        json!({
            "node_id": "nid1",
            "content_id": "cid1",
            "title": "First node",
            "description": "The descr. of the first node in the children.",
        }),
        json!({
            "node_id": "nid2",
            "content_id": "cid2",
            "title": "Second node",
            "description": "The second node is very special.",
        }),
        json!({
            "node_id": "nid3",
            "content_id": "cid3",
            "title": "Third node",
            "description": "The third node descr. is just the same thing again.",
        }),
    ]
}

pub fn sample_children_add_and_rm() -> Vec<Value> {
    let c = sample_children();
    vec![
        c[0].clone(),
        json!({
            "node_id": "nid4",
            "content_id": "cid4",
            "title": "Fourth node",
            "description": "This node was added in the second position.",
        }),
        c[2].clone(),
        json!({
            "node_id": "nid5",
            "content_id": "cid5",
            "title": "Fifth node",
            "description": "This node was appended after the third node.",
        }),
        json!({
            "node_id": "nid6",
            "content_id": "cid6",
            "title": "Sixth node",
            "description": "This node is last in the list.",
        }),
    ]
}

pub fn sample_children_reordered() -> Vec<Value> {
    let c = sample_children();
    vec![c[0].clone(), c[2].clone(), c[1].clone()]
}

pub fn sample_node() -> Node {
    obj(json!({
        "kind_id": "document",
        "node_id": "nidx",
        "content_id": "cidx",
        "title": "Sample node",
        "description": "This node is super simple.",
        "language": "en",
        "children": [],
        "files": [],
        "tags": [],
    }))
}

fn file(n: u32) -> Value {
    json!({
        "filename": format!("md5(file{n}.content).ext"),
        "size": 1000 + n,
        "preset": format!("file{n}_preset"),
        "original_filename": format!("original_name_of_file{n}.ext"),
        "language": "en",
        "source_url": format!("http://src.org/file{n}.ext"),
    })
}

pub fn sample_files() -> Vec<Value> {
    vec![file(1), file(2), file(3)]
}

pub fn sample_files_add_and_rm() -> Vec<Value> {
    vec![file(1), file(4), file(3), file(5), file(6)]
}

pub fn sample_files_reordered() -> Vec<Value> {
    vec![file(1), file(3), file(2)]
}

pub fn sample_assessment_items() -> Vec<Value> {
    vec![
        json!({
            "assessment_id": "aid1",
            "type": "single_selection",
            "files": [file(1), file(2)],
            "question": "Question one",
            "hints": ["q1hint1", "q1hint2"],
            "answers": ["q1answer1", "q1answer2"],
        }),
        json!({
            "assessment_id": "aid2",
            "type": "multiple_selection",
            "files": [],
            "question": "Question two",
            "hints": ["q2hint1", "q2hint2"],
            "answers": ["q2answer1", "q2answer2"],
        }),
        json!({
            "assessment_id": "aid3",
            "type": "single_selection",
            "files": [],
            "question": "Question three",
            "hints": ["q3hint1", "q3hint2"],
            "answers": ["q3answer1", "q3answer2"],
        }),
    ]
}

fn question(n: u32, kind: &str) -> Value {
    json!({
        "assessment_id": format!("aid{n}"),
        "type": kind,
        "files": [],
        "question": format!("Question {n}"),
        "hints": [format!("q{n}hint1"), format!("q{n}hint2")],
        "answers": [format!("q{n}answer1")],
    })
}

pub fn sample_assessment_items_add_and_rm() -> Vec<Value> {
    let items = sample_assessment_items();
    vec![
        items[0].clone(),
        question(4, "input_question"),
        items[2].clone(),
        question(5, "single_selection"),
        question(6, "single_selection"),
    ]
}

pub fn sample_assessment_items_reordered() -> Vec<Value> {
    let items = sample_assessment_items();
    vec![items[0].clone(), items[2].clone(), items[1].clone()]
}

pub fn sample_assessment_items_with_modifications() -> Vec<Value> {
    let mut items = sample_assessment_items();
    items[1]["question"] = json!("Modified question 2");
    items[2]["hints"] = json!(["q3hint1", "q3newhint"]);
    items
}

pub fn sample_assessment_items_with_file_modifications() -> Vec<Value> {
    let mut items = sample_assessment_items();
    items[0]["files"] = json!([file(1), file(4)]);
    items
}

/// A topic whose children are copies of `children` with ids and titles
/// prefixed so they are unique within a tree.
pub fn topic_with_children(prefix: &str, children: &[Value]) -> Value {
    let children: Vec<Value> = children
        .iter()
        .map(|child| {
            let mut child = child.clone();
            for key in ["node_id", "content_id"] {
                let id = child[key].as_str().unwrap_or_default().to_string();
                child[key] = json!(format!("{prefix}_{id}"));
            }
            let title = child["title"].as_str().unwrap_or_default().to_string();
            child["title"] = json!(format!("{title} ({prefix})"));
            child
        })
        .collect();
    json!({
        "title": format!("Topic {prefix}"),
        "node_id": prefix,
        "content_id": format!("{prefix}_cid"),
        "description": format!("The description of the {prefix} topic"),
        "language": "en",
        "children": children,
    })
}

fn topic(id: &str, children: Vec<Value>) -> Value {
    json!({
        "title": format!("Topic {id}"),
        "node_id": id,
        "content_id": format!("{id}cid"),
        "description": format!("The description of the {id} topic"),
        "language": "en",
        "children": children,
    })
}

/// ```text
/// - T1 (three leaves)
/// - T2
///   - T21 (three leaves)
///   - T22 (three leaves)
///   - T23 (three leaves)
/// - T3
///   - T31
///     - T311 (three leaves)
/// ```
pub fn sample_tree() -> Node {
    let leaves = sample_children();
    let t1 = topic_with_children("T1", &leaves);
    let t2 = topic(
        "T2",
        vec![
            topic_with_children("T21", &leaves),
            topic_with_children("T22", &leaves),
            topic_with_children("T23", &leaves),
        ],
    );
    let t3 = topic("T3", vec![topic("T31", vec![topic_with_children("T311", &leaves)])]);
    obj(json!({
        "title": "Sample tree",
        "node_id": "root",
        "content_id": "root_cid",
        "source_id": "sample-tree",
        "description": "A simple tree we can modify for all kinds of tests",
        "language": "en",
        "children": [t1, t2, t3],
    }))
}

/// [`sample_tree`] with two extra root children, the second a topic with
/// three leaves.
pub fn sample_tree_added() -> Node {
    let mut tree = sample_tree();
    let leaves = sample_children();
    let children = tree["children"].as_array_mut().unwrap();
    children.push(json!({
        "title": "Topic T4",
        "node_id": "T4",
        "content_id": "T4cid",
        "description": "A new leaf-level topic",
        "language": "en",
    }));
    children.push(topic_with_children("T5", &leaves));
    tree
}

/// [`sample_tree`] without the `T3` subtree.
pub fn sample_tree_with_removals() -> Node {
    let mut tree = sample_tree();
    tree["children"].as_array_mut().unwrap().truncate(2);
    tree
}

/// Borrow a list of JSON values as nodes.
pub fn as_nodes(values: &[Value]) -> Vec<&Node> {
    values.iter().map(|v| v.as_object().unwrap()).collect()
}
