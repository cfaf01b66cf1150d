//! Client/server round trips over loopback TCP.

#![cfg(feature = "server")]

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;

use ontoquery::client::{ClientError, OntologyClient};
use ontoquery::dispatch::Dispatcher;
use ontoquery::oracle::{OracleSettings, OwlOracle};
use ontoquery::protocol::{GetType, Request, RequestKind, Response, Status};
use ontoquery::transport::{Server, ShutdownSignal, read_frame, write_frame};

const FIXTURE: &str = include_str!("fixtures/rice.ttl");

async fn start(limit: usize) -> (std::net::SocketAddr, ShutdownSignal, tokio::task::JoinHandle<()>) {
    let oracle = OwlOracle::from_turtle_str(FIXTURE, &OracleSettings::default()).unwrap();
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(oracle), "name").unwrap());
    let server = Server::bind("127.0.0.1:0", dispatcher)
        .await
        .unwrap()
        .with_max_frame_bytes(limit);
    let addr = server.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let signal = shutdown.clone();
    let handle = tokio::spawn(async move {
        server.run(signal).await.unwrap();
    });
    (addr, shutdown, handle)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn typed_helpers() {
    let (addr, shutdown, handle) = start(1 << 20).await;

    tokio::task::spawn_blocking(move || {
        let client = OntologyClient::new(addr).unwrap();

        let rice = client.get_class("Rice").unwrap().unwrap();
        assert_eq!(rice.label(), Some("Lúa"));

        let supers = client.get_super_classes("Rice", GetType::All).unwrap().unwrap();
        let ids: Vec<&str> = supers.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["Organism", "Plant", "Thing"]);

        let subs = client.get_sub_classes("Pest", GetType::Direct).unwrap().unwrap();
        let ids: Vec<&str> = subs.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["Insect"]);

        assert!(client.get_class("Wheat").unwrap().is_none());

        let hopper = client.get_individual("BrownPlanthopper").unwrap().unwrap();
        assert_eq!(hopper.label(), Some("Rầy nâu"));

        let values = client.get_attribute_values("IR64").unwrap().unwrap();
        assert!(values.iter().any(|p| p.left.id() == "season"));

        let hits = client.search_individuals("dao on").unwrap().unwrap();
        assert_eq!(hits[0].left.id(), "BlastDisease");
    })
    .await
    .unwrap();

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn raw_send_reports_status() {
    let (addr, shutdown, handle) = start(1 << 20).await;

    tokio::task::spawn_blocking(move || {
        let client = OntologyClient::new(addr).unwrap();
        let response = client
            .send(&Request {
                kind: "GetWeather".into(),
                data: None,
            })
            .unwrap();
        assert_eq!(response.status, Status::Fail);

        let response = client
            .send(&Request::new(RequestKind::GetComment).with("Object", "Pest"))
            .unwrap();
        assert!(response.is_success());
    })
    .await
    .unwrap();

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn one_request_per_connection() {
    let (addr, shutdown, handle) = start(1 << 20).await;

    tokio::task::spawn_blocking(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        let request = Request::new(RequestKind::GetRelations).to_json().unwrap();
        write_frame(&mut stream, &request).unwrap();
        let reply = read_frame(&mut stream, 1 << 20).unwrap();
        assert!(Response::from_json(&reply).unwrap().is_success());

        // The server closes after the single response.
        let mut rest = Vec::new();
        stream.read_to_end(&mut rest).unwrap();
        assert!(rest.is_empty());
    })
    .await
    .unwrap();

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn oversized_frame_gets_fail() {
    let (addr, shutdown, handle) = start(64).await;

    tokio::task::spawn_blocking(move || {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(&1000u32.to_le_bytes()).unwrap();
        let reply = read_frame(&mut stream, 1 << 20).unwrap();
        assert_eq!(Response::from_json(&reply).unwrap().status, Status::Fail);
    })
    .await
    .unwrap();

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_surfaces_connection_errors() {
    let (addr, shutdown, handle) = start(1 << 20).await;
    shutdown.trigger();
    handle.await.unwrap();

    let result = tokio::task::spawn_blocking(move || {
        OntologyClient::new(addr).unwrap().get_class("Rice")
    })
    .await
    .unwrap();
    assert!(matches!(result, Err(ClientError::Transport(_))));
}
