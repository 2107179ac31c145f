//! Tests for the editable graph: connection invariants, cascading deletes and events.
mod common;
use ahash::AHashSet;
use chatflow::prelude::*;
use common::*;

#[cfg(test)]
mod graph_tests {
    use super::*;

    fn three_blocks() -> FlowGraph {
        let mut graph = FlowGraph::new();
        graph.add_block(Block::text("b1", "one")).unwrap();
        graph.add_block(Block::text("b2", "two")).unwrap();
        graph.add_block(Block::text("b3", "three")).unwrap();
        graph
    }

    #[test]
    fn test_self_connection_is_rejected() {
        let mut graph = three_blocks();
        let result = graph.connect(ConnectionSource::primary("b1"), "b1");

        assert!(matches!(result, Err(GraphError::SelfConnection { .. })));
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_duplicate_connection_is_rejected() {
        let mut graph = three_blocks();
        graph.connect(ConnectionSource::primary("b1"), "b2").unwrap();
        let result = graph.connect(ConnectionSource::primary("b1"), "b2");

        assert!(matches!(result, Err(GraphError::DuplicateConnection { .. })));
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn test_same_pair_from_different_quick_replies_is_allowed() {
        let mut graph = FlowGraph::new();
        graph
            .add_block(Block::text_with_replies("q", "Pick", ["A", "B"]))
            .unwrap();
        graph.add_block(Block::text("t", "target")).unwrap();

        graph.connect(ConnectionSource::quick_reply("q", 0), "t").unwrap();
        graph.connect(ConnectionSource::quick_reply("q", 1), "t").unwrap();
        graph.connect(ConnectionSource::primary("q"), "t").unwrap();

        assert_eq!(graph.connections().len(), 3);
    }

    #[test]
    fn test_quick_reply_branch_back_into_parent_is_rejected() {
        let mut graph = FlowGraph::new();
        graph
            .add_block(Block::text_with_replies("q", "Pick", ["A"]))
            .unwrap();

        let result = graph.connect(ConnectionSource::quick_reply("q", 0), "q");
        assert!(matches!(result, Err(GraphError::SelfConnection { .. })));
    }

    #[test]
    fn test_unknown_endpoints_are_rejected() {
        let mut graph = three_blocks();

        let missing_target = graph.connect(ConnectionSource::primary("b1"), "nope");
        assert!(matches!(missing_target, Err(GraphError::UnknownBlock { .. })));

        let missing_reply = graph.connect(ConnectionSource::quick_reply("b1", 0), "b2");
        assert!(matches!(
            missing_reply,
            Err(GraphError::UnknownQuickReply { index: 0, .. })
        ));
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_invariants_hold_over_operation_sequences() {
        let ids = ["a", "b", "c", "d"];
        let mut graph = FlowGraph::new();
        for id in ids {
            graph.add_block(Block::text(id, id)).unwrap();
        }

        // Deterministic pseudo-random sequence of add/remove attempts.
        let mut seed: u64 = 7;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as usize
        };
        for _ in 0..500 {
            let from = ids[next() % ids.len()];
            let to = ids[next() % ids.len()];
            if next() % 3 == 0 {
                let victim = graph
                    .connections()
                    .iter()
                    .nth(next() % (graph.connections().len() + 1))
                    .map(|c| c.id.clone());
                if let Some(id) = victim {
                    graph.remove_connection(&id);
                }
            } else {
                let _ = graph.connect(ConnectionSource::primary(from), to);
            }

            let pairs = edge_pairs(&graph);
            let unique: AHashSet<_> = pairs.iter().collect();
            assert_eq!(unique.len(), pairs.len(), "duplicate (from, to) pair");
            assert!(graph.connections().iter().all(|c| c.from.block_id() != c.to));
        }
    }

    #[test]
    fn test_remove_connection_is_idempotent() {
        let mut graph = three_blocks();
        let connection = graph.connect(ConnectionSource::primary("b1"), "b2").unwrap();

        assert!(graph.remove_connection(&connection.id).is_some());
        assert!(graph.remove_connection(&connection.id).is_none());
        assert!(graph.remove_connection("never-existed").is_none());
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_remove_block_cascades_to_every_incident_connection() {
        let mut graph = create_quick_reply_graph();
        graph.remove_block("choice").unwrap();

        assert!(!graph.contains_block("choice"));
        assert!(graph.connections().iter().all(|c| !c.touches("choice")));
        for block in graph.blocks() {
            let connections = graph.get_block_connections(&block.id);
            assert!(connections.incoming.iter().all(|c| c.from.block_id() != "choice"));
            assert!(connections.outgoing.iter().all(|c| c.to != "choice"));
        }
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_remove_unknown_block_fails() {
        let mut graph = three_blocks();
        assert!(matches!(
            graph.remove_block("ghost"),
            Err(GraphError::UnknownBlock { .. })
        ));
        assert_eq!(graph.blocks().len(), 3);
    }

    #[test]
    fn test_get_block_connections_includes_quick_reply_branches() {
        let graph = create_quick_reply_graph();
        let connections = graph.get_block_connections("choice");

        assert_eq!(connections.incoming.len(), 1);
        assert_eq!(connections.outgoing.len(), 3);
        assert!(connections.outgoing.iter().any(|c| c.from.quick_reply_index() == Some(1)));
    }

    #[test]
    fn test_update_block_drops_branches_of_removed_replies() {
        let mut graph = create_quick_reply_graph();
        graph
            .update_block(Block::text_with_replies("choice", "Continue?", ["Yes"]))
            .unwrap();

        let outgoing: Vec<_> = graph
            .get_block_connections("choice")
            .outgoing
            .iter()
            .map(|c| c.from.encode())
            .collect();
        assert_eq!(outgoing, vec!["choice-qr-0", "choice"]);
    }

    #[test]
    fn test_duplicate_block_gets_fresh_id_and_no_connections() {
        let mut graph = create_greeting_graph();
        let first = graph.duplicate_block("reply").unwrap();
        let second = graph.duplicate_block("reply").unwrap();

        assert_ne!(first, second);
        assert_eq!(first, "reply-dup");
        let copy = graph.block(&first).unwrap();
        assert_eq!(copy.kind, graph.block("reply").unwrap().kind);
        assert_ne!(copy.position, graph.block("reply").unwrap().position);
        assert!(graph.get_block_connections(&first).incoming.is_empty());
    }

    #[test]
    fn test_duplicate_block_id_is_rejected() {
        let mut graph = three_blocks();
        let result = graph.add_block(Block::text("b1", "again"));
        assert!(matches!(result, Err(GraphError::DuplicateBlock { .. })));
    }

    #[test]
    fn test_events_are_published_after_mutations() {
        let mut graph = three_blocks();
        let events = record_events(&mut graph);

        let connection = graph.connect(ConnectionSource::primary("b1"), "b2").unwrap();
        graph.connect(ConnectionSource::primary("b2"), "b3").unwrap();
        graph.select_block("b1").unwrap();
        graph.remove_block("b2").unwrap();

        let names: Vec<_> = events.lock().unwrap().iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec![
                "connectionCreated",
                "connectionCreated",
                "selectBlock",
                "connectionDeleted",
                "connectionDeleted",
                "blockRemoved",
            ]
        );
        assert_eq!(
            events.lock().unwrap()[0],
            GraphEvent::ConnectionCreated(connection)
        );
    }

    #[test]
    fn test_rejected_mutation_publishes_nothing() {
        let mut graph = three_blocks();
        let events = record_events(&mut graph);

        let _ = graph.connect(ConnectionSource::primary("b1"), "b1");
        let _ = graph.select_block("ghost");

        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut graph = three_blocks();
        let events = std::sync::Arc::new(std::sync::Mutex::new(0usize));
        let sink = events.clone();
        let id = graph.subscribe(move |_| *sink.lock().unwrap() += 1);

        graph.select_block("b1").unwrap();
        assert!(graph.unsubscribe(id));
        graph.select_block("b2").unwrap();

        assert_eq!(*events.lock().unwrap(), 1);
    }

    #[test]
    fn test_reconnect_replaces_existing_output() {
        let mut graph = three_blocks();
        graph.connect(ConnectionSource::primary("b1"), "b2").unwrap();
        graph.reconnect(ConnectionSource::primary("b1"), "b3").unwrap();

        assert_eq!(edge_pairs(&graph), vec![("b1".to_string(), "b3".to_string())]);
    }

    #[test]
    fn test_update_connection_points() {
        let mut graph = three_blocks();
        let connection = graph.connect(ConnectionSource::primary("b1"), "b2").unwrap();

        assert!(graph.update_connection_points(
            &connection.id,
            Position::new(1.0, 2.0),
            Position::new(3.0, 4.0)
        ));
        assert!(!graph.update_connection_points("missing", Position::default(), Position::default()));
        let stored = graph.connections().get(&connection.id).unwrap();
        assert_eq!(stored.from_point, Some(Position::new(1.0, 2.0)));
        assert_eq!(stored.to_point, Some(Position::new(3.0, 4.0)));
    }

    #[test]
    fn test_quick_reply_key_round_trip() {
        let source = ConnectionSource::quick_reply("ask", 2);
        assert_eq!(source.encode(), "ask-qr-2");
        assert_eq!(ConnectionSource::decode("ask-qr-2"), source);
        assert_eq!(
            ConnectionSource::decode("plain-id"),
            ConnectionSource::primary("plain-id")
        );
    }
}
