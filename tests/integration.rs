//! Integration tests for Chatflow
//!
//! End-to-end tests: edit a graph, publish it, and chat with the result.
//!
mod common;
use chatflow::engine::DEFAULT_FALLBACK_MESSAGE;
use chatflow::prelude::*;
use common::*;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn test_scenario_keyword_greeting() {
        let engine = engine_for(&create_greeting_graph());
        let reply = engine.execute("Hello!!");

        assert_eq!(reply.responses, vec![Response::text("Hi there")]);
        let value = serde_json::to_value(&reply.responses).unwrap();
        assert_eq!(value, serde_json::json!([{ "type": "text", "content": "Hi there" }]));
    }

    #[test]
    fn test_scenario_unmatched_message_falls_back() {
        let engine = engine_for(&create_greeting_graph());
        let reply = engine.execute("goodbye");

        assert_eq!(reply.responses, vec![Response::text(DEFAULT_FALLBACK_MESSAGE)]);
    }

    #[test]
    fn test_scenario_quick_reply_walks_only_its_branch() {
        let engine = engine_for(&create_quick_reply_graph());
        let reply = engine.select_quick_reply("choice", 0);

        assert_eq!(texts(&reply), vec!["Great"]);
        assert!(!texts(&reply).contains(&"Maybe later".to_string()));
    }

    #[test]
    fn test_scenario_self_connection_rejected() {
        let mut graph = FlowGraph::new();
        graph.add_block(Block::text("b1", "one")).unwrap();
        let before = edge_pairs(&graph);

        let result = graph.add_connection(Connection::new("c1", ConnectionSource::primary("b1"), "b1"));

        assert!(result.is_err());
        assert_eq!(edge_pairs(&graph), before);
    }

    #[test]
    fn test_scenario_duplicate_connection_rejected() {
        let mut graph = FlowGraph::new();
        graph.add_block(Block::text("b1", "one")).unwrap();
        graph.add_block(Block::text("b2", "two")).unwrap();

        graph
            .add_connection(Connection::new("c1", ConnectionSource::primary("b1"), "b2"))
            .unwrap();
        let second =
            graph.add_connection(Connection::new("c2", ConnectionSource::primary("b1"), "b2"));

        assert!(matches!(second, Err(GraphError::DuplicateConnection { .. })));
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn test_scenario_deleting_target_removes_connection() {
        let mut graph = FlowGraph::new();
        graph.add_block(Block::text("b1", "one")).unwrap();
        graph.add_block(Block::text("b2", "two")).unwrap();
        graph.connect(ConnectionSource::primary("b1"), "b2").unwrap();

        graph.remove_block("b2").unwrap();

        assert!(graph.connections().is_empty());
        assert!(graph.get_block_connections("b1").outgoing.is_empty());
    }

    #[test]
    fn test_editor_document_import_decodes_branch_keys() {
        let graph = EditorDocument::from_json(EDITOR_DOCUMENT_JSON)
            .unwrap()
            .into_flow()
            .unwrap();

        let branch = graph.connections().get("c2").unwrap();
        assert_eq!(branch.from, ConnectionSource::quick_reply("ask", 0));
        assert_eq!(branch.from_point, Some(Position::new(60.0, 150.0)));
        assert_eq!(graph.get_block_connections("ask").outgoing.len(), 2);
    }

    #[test]
    fn test_editor_document_round_trip() {
        let graph = create_quick_reply_graph();
        let json = EditorDocument::from_graph(&graph).to_json().unwrap();
        assert!(json.contains("choice-qr-1"));

        let restored = EditorDocument::from_json(&json).unwrap().into_flow().unwrap();
        assert_eq!(edge_pairs(&restored), edge_pairs(&graph));
        assert_eq!(serialize_flow(&restored), serialize_flow(&graph));
    }

    #[test]
    fn test_editor_document_with_invalid_connection_is_rejected() {
        let json = r#"{
            "blocks": [{ "id": "a", "type": "textResponse", "content": "a" }],
            "connections": [{ "id": "c1", "fromBlockId": "a", "toBlockId": "a" }]
        }"#;
        let result = EditorDocument::from_json(json).unwrap().into_flow();

        assert!(matches!(
            result,
            Err(ConversionError::Graph(GraphError::SelfConnection { .. }))
        ));
    }

    #[test]
    fn test_edit_publish_and_chat() {
        let graph = EditorDocument::from_json(EDITOR_DOCUMENT_JSON)
            .unwrap()
            .into_flow()
            .unwrap();
        let document = FlowSerializer::builder(&graph)
            .with_name("Orders")
            .build()
            .serialize();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.bin");
        document.save(path.to_str().unwrap()).unwrap();
        let engine = FlowEngine::new(RuntimeDocument::load(path.to_str().unwrap()).unwrap()).unwrap();

        let mut session = Session::new();
        let first = engine.respond(&mut session, UserAction::message("What is my Order Status?"));
        assert_eq!(texts(&first), vec!["Do you have your order number?"]);
        assert_eq!(session.awaiting_quick_reply.as_deref(), Some("ask"));

        let second = engine.respond(&mut session, UserAction::message("yes"));
        let Response::Form { content } = &second.responses[0] else {
            panic!("expected a form response, got {:?}", second.responses);
        };
        assert_eq!(content.form_id, "order-lookup");
        assert_eq!(content.fields[0].prompt_phrase, "Order number?");
        assert!(content.fields[0].required);
    }

    #[test]
    fn test_editing_after_publish_does_not_change_published_document() {
        let mut graph = create_greeting_graph();
        let engine = engine_for(&graph);

        graph.update_block(Block::text("reply", "Changed")).unwrap();

        assert_eq!(texts(&engine.execute("hello")), vec!["Hi there"]);
        assert_eq!(texts(&engine_for(&graph).execute("hello")), vec!["Changed"]);
    }
}
