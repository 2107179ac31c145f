//! Common test utilities for building conversation graphs and documents.
use chatflow::prelude::*;
use std::sync::{Arc, Mutex};

/// `greet` (keywords: hello) -> `reply` ("Hi there")
#[allow(dead_code)]
pub fn create_greeting_graph() -> FlowGraph {
    let mut graph = FlowGraph::new();
    graph
        .add_block(Block::user_input(
            "greet",
            UserInputMatcher::keywords(vec![vec!["hello"]]),
        ))
        .unwrap();
    graph.add_block(Block::text("reply", "Hi there")).unwrap();
    graph
        .connect(ConnectionSource::primary("greet"), "reply")
        .unwrap();
    graph
}

/// `menu` (keywords: menu) -> `choice` ("Continue?" with Yes/No)
///
/// Branches: Yes -> `yes` ("Great"), No -> `no` ("Maybe later").
/// `choice` also has a primary output to `after` ("Primary path").
#[allow(dead_code)]
pub fn create_quick_reply_graph() -> FlowGraph {
    let mut graph = FlowGraph::new();
    graph
        .add_block(Block::user_input(
            "menu",
            UserInputMatcher::keywords(vec![vec!["menu"]]),
        ))
        .unwrap();
    graph
        .add_block(Block::text_with_replies("choice", "Continue?", ["Yes", "No"]))
        .unwrap();
    graph.add_block(Block::text("yes", "Great")).unwrap();
    graph.add_block(Block::text("no", "Maybe later")).unwrap();
    graph.add_block(Block::text("after", "Primary path")).unwrap();

    graph
        .connect(ConnectionSource::primary("menu"), "choice")
        .unwrap();
    graph
        .connect(ConnectionSource::quick_reply("choice", 0), "yes")
        .unwrap();
    graph
        .connect(ConnectionSource::quick_reply("choice", 1), "no")
        .unwrap();
    graph
        .connect(ConnectionSource::primary("choice"), "after")
        .unwrap();
    graph
}

/// Publishes a graph and builds an engine with default settings.
#[allow(dead_code)]
pub fn engine_for(graph: &FlowGraph) -> FlowEngine {
    FlowEngine::new(serialize_flow(graph)).expect("published document is valid")
}

/// The text contents of a reply, in order.
#[allow(dead_code)]
pub fn texts(reply: &Reply) -> Vec<String> {
    reply
        .responses
        .iter()
        .filter_map(|r| match r {
            Response::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect()
}

/// Subscribes a recorder that collects every event the graph publishes.
#[allow(dead_code)]
pub fn record_events(graph: &mut FlowGraph) -> Arc<Mutex<Vec<GraphEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    graph.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

/// Every `(from, to)` pair of the graph, in connection order.
#[allow(dead_code)]
pub fn edge_pairs(graph: &FlowGraph) -> Vec<(String, String)> {
    graph
        .connections()
        .iter()
        .map(|c| (c.from.encode(), c.to.clone()))
        .collect()
}

/// A runtime document in the wire JSON shape a widget reads.
#[allow(dead_code)]
pub const GREETING_DOCUMENT_JSON: &str = r#"
{
    "name": "Greeter",
    "welcomeMessage": "Welcome!",
    "blocks": [
        {
            "id": "greet",
            "type": "userInput",
            "subType": "keywordGroup",
            "keywordGroups": [["hello", "hi"]],
            "x": 0, "y": 0,
            "outputs": [{ "toBlockId": "wait" }]
        },
        {
            "id": "wait",
            "type": "typingDelay",
            "delaySeconds": 0.5,
            "x": 0, "y": 100,
            "outputs": [{ "toBlockId": "reply" }]
        },
        {
            "id": "reply",
            "type": "textResponse",
            "content": "Hi there",
            "quickReplies": [
                { "id": "r0", "text": "Pricing", "value": "pricing" },
                { "id": "r1", "text": "Support" }
            ],
            "x": 0, "y": 200,
            "outputs": [],
            "quickReplyOutputs": [{ "quickReplyIndex": 0, "toBlockId": "pricing" }]
        },
        {
            "id": "pricing",
            "type": "textResponse",
            "content": "Plans start at $10.",
            "x": 200, "y": 200,
            "outputs": []
        }
    ]
}
"#;

/// An editor document as persisted by the canvas, including a `-qr-` branch key.
#[allow(dead_code)]
pub const EDITOR_DOCUMENT_JSON: &str = r#"
{
    "blocks": [
        { "id": "start", "type": "userInput", "subType": "phrase", "phraseText": "order status", "x": 10, "y": 10 },
        { "id": "ask", "type": "textResponse", "content": "Do you have your order number?",
          "quickReplies": [{ "id": "q0", "text": "Yes" }, { "id": "q1", "text": "No" }], "x": 10, "y": 120 },
        { "id": "form", "type": "conversationalForm", "formId": "order-lookup",
          "formFields": [{ "name": "order", "type": "text", "required": true, "promptPhrase": "Order number?" }],
          "x": 200, "y": 120 },
        { "id": "help", "type": "textResponse", "content": "No problem, an agent will reach out.", "x": 200, "y": 240 }
    ],
    "connections": [
        { "id": "c1", "fromBlockId": "start", "toBlockId": "ask" },
        { "id": "c2", "fromBlockId": "ask-qr-0", "toBlockId": "form",
          "fromPoint": { "x": 60, "y": 150 }, "toPoint": { "x": 200, "y": 120 } },
        { "id": "c3", "fromBlockId": "ask-qr-1", "toBlockId": "help" }
    ]
}
"#;
