use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::{net::TcpListener, sync::watch};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tradewatch_data::{
    BackoffPolicy, ConnectionStatus, Pair, Side, StreamConfig, StreamConnector,
};

const SUBSCRIPTIONS_ACK: &str =
    r#"{"type":"subscriptions","channels":[{"name":"ticker","product_ids":["ETH-USD"]}]}"#;

fn ticker(side: &str, price: &str, time: &str) -> String {
    format!(
        r#"{{"type":"ticker","product_id":"ETH-USD","side":"{side}","price":"{price}","time":"{time}"}}"#
    )
}

#[tokio::test]
async fn test_connector_forwards_trades_and_reconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let mut subscriptions = Vec::new();

        // First connection: handshake noise, two trades, then the server hangs up.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        if let Some(Ok(Message::Text(text))) = ws.next().await {
            subscriptions.push(text.as_str().to_string());
        }
        ws.send(Message::text(SUBSCRIPTIONS_ACK)).await.unwrap();
        ws.send(Message::text(r#"{"type":"ticker","product_id":"ETH-USD","price":"3000.00"}"#))
            .await
            .unwrap();
        ws.send(Message::text(ticker("buy", "3001.50", "2024-03-11T14:05:12Z")))
            .await
            .unwrap();
        ws.send(Message::text("{garbage")).await.unwrap();
        ws.send(Message::text(ticker("sell", "2999.25", "2024-03-11T14:05:13Z")))
            .await
            .unwrap();
        ws.close(None).await.unwrap();

        // Second connection: resubscribe and deliver one more trade.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        if let Some(Ok(Message::Text(text))) = ws.next().await {
            subscriptions.push(text.as_str().to_string());
        }
        ws.send(Message::text(ticker("buy", "3002.00", "2024-03-11T14:05:20Z")))
            .await
            .unwrap();

        // Hold the connection open until the client goes away.
        while let Some(Ok(_)) = ws.next().await {}

        subscriptions
    });

    let config = StreamConfig::new(Pair::new("eth", "usd"))
        .with_url(format!("ws://{addr}"))
        .with_backoff(
            BackoffPolicy::default()
                .with_unit(Duration::from_millis(10))
                .with_jitter(0.0),
        );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut feed = StreamConnector::new(config).start(shutdown_rx);

    let mut trades = Vec::new();
    while trades.len() < 3 {
        let trade = tokio::time::timeout(Duration::from_secs(5), feed.trades.recv())
            .await
            .expect("trade should arrive")
            .expect("connector should still be running");
        trades.push(trade);
    }

    let summary: Vec<(Side, f64)> = trades.iter().map(|t| (t.side, t.price)).collect();
    assert_eq!(
        summary,
        vec![(Side::Buy, 3001.50), (Side::Sell, 2999.25), (Side::Buy, 3002.00)]
    );
    assert_eq!(*feed.status.borrow(), ConnectionStatus::Connected);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), &mut feed.task)
        .await
        .expect("connector should stop after shutdown")
        .unwrap();
    assert_eq!(*feed.status.borrow(), ConnectionStatus::Disconnected);

    let subscriptions = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should finish once the client closes")
        .unwrap();
    assert_eq!(subscriptions.len(), 2);
    for subscription in subscriptions {
        let value: serde_json::Value = serde_json::from_str(&subscription).unwrap();
        assert_eq!(value["type"], "subscribe");
        assert_eq!(value["channels"][0]["name"], "ticker");
        assert_eq!(value["channels"][0]["product_ids"][0], "ETH-USD");
    }
}

#[tokio::test]
async fn test_initial_dial_failure_is_retried() {
    // Reserve a free port, then release it so the first dial is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = StreamConfig::new(Pair::new("eth", "usd"))
        .with_url(format!("ws://{addr}"))
        .with_backoff(
            BackoffPolicy::default()
                .with_unit(Duration::from_millis(50))
                .with_jitter(0.0),
        );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut feed = StreamConnector::new(config).start(shutdown_rx);

    tokio::time::timeout(
        Duration::from_secs(5),
        feed.status
            .wait_for(|status| *status == ConnectionStatus::Reconnecting),
    )
    .await
    .expect("first dial should fail")
    .unwrap();

    let listener = TcpListener::bind(addr).await.unwrap();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.next().await;
        ws.send(Message::text(ticker("buy", "1.5", "2024-03-11T14:05:12Z")))
            .await
            .unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let trade = tokio::time::timeout(Duration::from_secs(5), feed.trades.recv())
        .await
        .expect("trade should arrive after the retry")
        .expect("connector should still be running");
    assert_eq!((trade.side, trade.price), (Side::Buy, 1.5));

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), &mut feed.task)
        .await
        .expect("connector should stop after shutdown")
        .unwrap();
    server.abort();
}

#[tokio::test]
async fn test_idle_feed_is_reconnected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let mut subscriptions = 0;

        // First connection: subscribe acknowledged by silence until the client gives up.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        if let Some(Ok(Message::Text(_))) = ws.next().await {
            subscriptions += 1;
        }
        while let Some(Ok(_)) = ws.next().await {}

        // Second connection: the client resubscribes.
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        if let Some(Ok(Message::Text(_))) = ws.next().await {
            subscriptions += 1;
        }
        ws.send(Message::text(ticker("sell", "2500.00", "2024-03-11T14:05:12Z")))
            .await
            .unwrap();

        subscriptions
    });

    let config = StreamConfig::new(Pair::new("eth", "usd"))
        .with_url(format!("ws://{addr}"))
        .with_read_timeout(Duration::from_millis(50))
        .with_backoff(
            BackoffPolicy::default()
                .with_unit(Duration::from_millis(10))
                .with_jitter(0.0),
        );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut feed = StreamConnector::new(config).start(shutdown_rx);

    let trade = tokio::time::timeout(Duration::from_secs(5), feed.trades.recv())
        .await
        .expect("trade should arrive on the second connection")
        .expect("connector should still be running");
    assert_eq!((trade.side, trade.price), (Side::Sell, 2500.0));

    let subscriptions = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should see two connections")
        .unwrap();
    assert_eq!(subscriptions, 2);

    shutdown_tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), &mut feed.task)
        .await
        .expect("connector should stop after shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_dropped_receiver_stops_connector() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.next().await;

        // Stream trades until the client goes away.
        loop {
            let trade = ticker("buy", "3000.00", "2024-03-11T14:05:12Z");
            if ws.send(Message::text(trade)).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });

    let config = StreamConfig::new(Pair::new("eth", "usd")).with_url(format!("ws://{addr}"));

    // The shutdown sender stays alive, so only the dropped receiver can stop the task.
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut feed = StreamConnector::new(config).start(shutdown_rx);

    tokio::time::timeout(Duration::from_secs(5), feed.trades.recv())
        .await
        .expect("trade should arrive")
        .expect("connector should still be running");
    drop(feed.trades);

    tokio::time::timeout(Duration::from_secs(5), &mut feed.task)
        .await
        .expect("connector should stop once the receiver is dropped")
        .unwrap();
    assert_eq!(*feed.status.borrow(), ConnectionStatus::Disconnected);

    server.abort();
}
