//! End-to-end scenarios driving full networks to quiescence through a
//! minimal deterministic event queue: events fire in nondecreasing time
//! order, ties broken by insertion order, exactly the delivery contract
//! the real scheduler provides.

use std::collections::BTreeMap;

use routing_sim::{
    EngineConfig, Link, Node, NodeId, RouteTable, RoutingMessage, RoutingMode, SimulationContext,
};

struct Event {
    at: f64,
    order: u64,
    target: NodeId,
    payload: RoutingMessage,
}

struct TestNet {
    now: f64,
    next_order: u64,
    queue: Vec<Event>,
    links: Vec<Link>,
}

impl TestNet {
    fn new(links: Vec<Link>) -> Self {
        Self {
            now: 0.0,
            next_order: 0,
            queue: Vec::new(),
            links,
        }
    }

    fn pop_earliest(&mut self) -> Option<Event> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.at.partial_cmp(&b.at)
                    .unwrap()
                    .then(a.order.cmp(&b.order))
            })
            .map(|(i, _)| i)?;
        let event = self.queue.remove(idx);
        self.now = event.at;
        Some(event)
    }

    fn set_link_latency(&mut self, src: NodeId, dest: NodeId, latency: f64) -> Link {
        let link = self
            .links
            .iter_mut()
            .find(|l| l.src == src && l.dest == dest)
            .unwrap();
        link.latency = latency;
        link.clone()
    }
}

impl SimulationContext for TestNet {
    fn now(&self) -> f64 {
        self.now
    }

    fn schedule_delivery(&mut self, at: f64, target: NodeId, payload: RoutingMessage) {
        let order = self.next_order;
        self.next_order += 1;
        self.queue.push(Event {
            at,
            order,
            target,
            payload,
        });
    }

    fn neighbors_of(&self, node: NodeId) -> Vec<NodeId> {
        self.links
            .iter()
            .filter(|l| l.src == node)
            .map(|l| l.dest)
            .collect()
    }

    fn outgoing_links(&self, node: NodeId) -> Vec<Link> {
        self.links
            .iter()
            .filter(|l| l.src == node)
            .cloned()
            .collect()
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A - B - C line: latencies A-B = 1, B-C = 2, both directions.
fn line_links() -> Vec<Link> {
    vec![
        Link::new(0, 1, 100.0, 1.0).unwrap(),
        Link::new(1, 0, 100.0, 1.0).unwrap(),
        Link::new(1, 2, 100.0, 2.0).unwrap(),
        Link::new(2, 1, 100.0, 2.0).unwrap(),
    ]
}

fn build_nodes(ids: &[NodeId], mode: RoutingMode) -> BTreeMap<NodeId, Node> {
    let config = EngineConfig {
        mode,
        ..EngineConfig::default()
    };
    ids.iter().map(|&id| (id, Node::new(id, &config))).collect()
}

/// Announce every node's outgoing links, then deliver events until the
/// queue drains. Returns the number of messages delivered.
fn run_to_quiescence(net: &mut TestNet, nodes: &mut BTreeMap<NodeId, Node>) -> usize {
    for link in net.links.clone() {
        nodes
            .get_mut(&link.src)
            .unwrap()
            .on_link_update(net, &link)
            .unwrap();
    }
    drain(net, nodes)
}

fn drain(net: &mut TestNet, nodes: &mut BTreeMap<NodeId, Node>) -> usize {
    let mut delivered = 0;
    while let Some(event) = net.pop_earliest() {
        nodes
            .get_mut(&event.target)
            .unwrap()
            .on_routing_message(net, event.payload)
            .unwrap();
        delivered += 1;
    }
    delivered
}

#[test]
fn link_state_line_converges_to_shortest_paths() {
    init_logs();
    let mut net = TestNet::new(line_links());
    let mut nodes = build_nodes(&[0, 1, 2], RoutingMode::LinkState);
    let delivered = run_to_quiescence(&mut net, &mut nodes);
    assert!(delivered > 0);

    // A reaches C through B at the mathematically shortest cost
    assert_eq!(nodes[&0].next_hop(&net, 2).unwrap(), 1);
    assert_eq!(nodes[&0].routing_table().path_cost(2), Some(3.0));
    assert_eq!(nodes[&0].next_hop(&net, 1).unwrap(), 1);
    assert_eq!(nodes[&2].next_hop(&net, 0).unwrap(), 1);
    assert_eq!(nodes[&2].routing_table().path_cost(0), Some(3.0));
    assert_eq!(nodes[&1].next_hop(&net, 0).unwrap(), 0);
    assert_eq!(nodes[&1].next_hop(&net, 2).unwrap(), 2);
}

#[test]
fn distance_vector_line_converges_to_the_same_routes() {
    init_logs();
    let mut net = TestNet::new(line_links());
    let mut nodes = build_nodes(&[0, 1, 2], RoutingMode::DistanceVector);
    run_to_quiescence(&mut net, &mut nodes);

    assert_eq!(nodes[&0].next_hop(&net, 2).unwrap(), 1);
    assert_eq!(nodes[&0].routing_table().path_cost(2), Some(3.0));
    assert_eq!(nodes[&2].next_hop(&net, 0).unwrap(), 1);
    assert_eq!(nodes[&1].next_hop(&net, 0).unwrap(), 0);
    assert_eq!(nodes[&1].next_hop(&net, 2).unwrap(), 2);

    // purely local exchange: no node ever materialized a topology graph
    for node in nodes.values() {
        assert!(matches!(node.routing_table(), RouteTable::DistanceVector(_)));
    }
}

#[test]
fn no_node_routes_to_itself() {
    init_logs();
    for mode in [RoutingMode::LinkState, RoutingMode::DistanceVector] {
        let mut net = TestNet::new(line_links());
        let mut nodes = build_nodes(&[0, 1, 2], mode);
        run_to_quiescence(&mut net, &mut nodes);
        for (&id, node) in &nodes {
            assert!(!node.routing_table().forwarding_table().contains_key(&id));
            assert!(node.next_hop(&net, id).is_err());
        }
    }
}

#[test]
fn duplicate_delivery_causes_no_rebroadcast() {
    init_logs();
    let mut net = TestNet::new(line_links());
    let mut nodes = build_nodes(&[0, 1, 2], RoutingMode::LinkState);
    run_to_quiescence(&mut net, &mut nodes);

    // replay node 1's advertisement of its B->C link at node 0
    let advert = match nodes[&1].routing_table() {
        RouteTable::LinkState(table) => {
            let record = table.record(1, 2).unwrap().clone();
            RoutingMessage::LinkState(routing_sim::LinkStateAdvert {
                origin: 1,
                seq: record.seq,
                link: record,
            })
        }
        other => panic!("unexpected table {:?}", other),
    };

    let node0 = nodes.get_mut(&0).unwrap();
    let before = node0.routing_table().forwarding_table().clone();
    node0.on_routing_message(&mut net, advert.clone()).unwrap();
    node0.on_routing_message(&mut net, advert).unwrap();

    assert!(net.queue.is_empty());
    assert_eq!(node0.routing_table().forwarding_table(), &before);
}

#[test]
fn latency_increase_rebroadcasts_but_keeps_next_hops() {
    init_logs();
    let mut net = TestNet::new(line_links());
    let mut nodes = build_nodes(&[0, 1, 2], RoutingMode::LinkState);
    run_to_quiescence(&mut net, &mut nodes);

    let hops_before: Vec<_> = nodes
        .values()
        .map(|n| n.routing_table().forwarding_table().clone())
        .collect();

    // A-B goes from 1 to 1.5: costs shift, shortest-path shape does not
    let updated = net.set_link_latency(0, 1, 1.5);
    nodes
        .get_mut(&0)
        .unwrap()
        .on_link_update(&mut net, &updated)
        .unwrap();
    assert!(!net.queue.is_empty());
    let delivered = drain(&mut net, &mut nodes);
    assert!(delivered > 0);

    let hops_after: Vec<_> = nodes
        .values()
        .map(|n| n.routing_table().forwarding_table().clone())
        .collect();
    assert_eq!(hops_before, hops_after);
    assert_eq!(nodes[&0].routing_table().path_cost(2), Some(3.5));
}

#[test]
fn partitioned_nodes_stay_out_of_the_forwarding_table() {
    init_logs();
    // two islands: 0-1 and 8-9
    let links = vec![
        Link::new(0, 1, 100.0, 1.0).unwrap(),
        Link::new(1, 0, 100.0, 1.0).unwrap(),
        Link::new(8, 9, 100.0, 1.0).unwrap(),
        Link::new(9, 8, 100.0, 1.0).unwrap(),
    ];
    let mut net = TestNet::new(links);
    let mut nodes = build_nodes(&[0, 1, 8, 9], RoutingMode::LinkState);
    run_to_quiescence(&mut net, &mut nodes);

    assert!(!nodes[&0].routing_table().forwarding_table().contains_key(&8));
    assert!(nodes[&0].next_hop(&net, 8).is_err());
    assert_eq!(nodes[&0].next_hop(&net, 1).unwrap(), 1);
    assert_eq!(nodes[&8].next_hop(&net, 9).unwrap(), 9);
}
