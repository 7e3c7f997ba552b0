use std::fmt;

use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{http::Uri, Message};

use crate::data_handling::{Column, SeriesRegistry};
use crate::error::{FeedError, FeedResult};
use crate::feed::snapshot::Snapshot;
use crate::render::{ChartOptions, Dataset, Renderer};
use crate::Settings;

/// Connection lifecycle of the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Disconnected,
    Connecting,
    Open,
    Closed,
    Errored,
}

impl StreamState {
    /// Closed and Errored need an explicit new connect to resume.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamState::Closed | StreamState::Errored)
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamState::Disconnected => "disconnected",
            StreamState::Connecting => "connecting",
            StreamState::Open => "open",
            StreamState::Closed => "closed",
            StreamState::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// What the transport reports to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Opened,
    Message(String),
    Closed,
    Error(String),
}

/// StreamController owns one chart session: the registry, the renderer and the
/// state of the websocket feeding them.
///
/// Every event is handled to completion (parse, merge, redraw) before the next
/// one is read, so the registry needs no locking.
pub struct StreamController<R: Renderer> {
    state: StreamState,
    registry: SeriesRegistry,
    renderer: R,
    options: ChartOptions,
}

impl<R: Renderer> StreamController<R> {
    pub fn new(registry: SeriesRegistry, renderer: R, options: ChartOptions) -> Self {
        StreamController {
            state: StreamState::Disconnected,
            registry,
            renderer,
            options,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn registry(&self) -> &SeriesRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Seeds the registry with historical data and draws it. A snapshot without
    /// any points draws nothing.
    pub fn load_snapshot(&mut self, snapshot: &Snapshot) {
        if snapshot.is_empty() {
            info!("Snapshot is empty, nothing to plot");
            return;
        }
        self.registry.seed(snapshot);
        self.redraw();
    }

    pub fn redraw(&mut self) {
        let dataset = Dataset::from_registry(&self.registry, &self.options);
        self.renderer.draw(&dataset);
    }

    /// Validates the target and moves to `Connecting`.
    ///
    /// A missing or invalid address leaves the controller `Disconnected`.
    pub fn begin_connect(&mut self, uri: Option<&str>) -> FeedResult<String> {
        if matches!(self.state, StreamState::Connecting | StreamState::Open) {
            return Err(FeedError::InvalidState(self.state));
        }

        let uri = match uri.map(str::trim).filter(|u| !u.is_empty()) {
            Some(uri) => uri,
            None => return Err(self.connect_failed("<none>", "no websocket uri configured")),
        };

        let valid_scheme = uri.starts_with("ws://") || uri.starts_with("wss://");
        if !valid_scheme || uri.parse::<Uri>().is_err() {
            return Err(self.connect_failed(uri, "not a ws:// or wss:// uri"));
        }

        info!("Connecting...: {}", uri);
        self.state = StreamState::Connecting;
        Ok(uri.to_string())
    }

    fn connect_failed(&mut self, uri: &str, reason: impl Into<String>) -> FeedError {
        self.state = StreamState::Disconnected;
        let err = FeedError::TransportUnavailable {
            uri: uri.to_string(),
            reason: reason.into(),
        };
        error!("{}", err);
        err
    }

    /// Single dispatch point for transport events.
    ///
    /// Returns a text frame to send to the peer, if any.
    pub fn handle_event(&mut self, event: StreamEvent) -> Option<String> {
        match event {
            StreamEvent::Opened => {
                if self.state != StreamState::Connecting {
                    warn!("Ignoring open signal while {}", self.state);
                    return None;
                }
                self.state = StreamState::Open;
                info!("Sending hello");
                Some(Settings::HANDSHAKE.to_string())
            }
            StreamEvent::Message(text) => {
                if self.state != StreamState::Open {
                    debug!("Ignoring message while {}", self.state);
                    return None;
                }
                if let Err(e) = self.handle_message(&text) {
                    warn!("{}", e);
                }
                None
            }
            StreamEvent::Closed => {
                if matches!(self.state, StreamState::Connecting | StreamState::Open) {
                    info!("Websocket closed");
                    self.state = StreamState::Closed;
                }
                None
            }
            StreamEvent::Error(reason) => {
                error!("{}", FeedError::Transport(reason));
                self.state = StreamState::Errored;
                None
            }
        }
    }

    /// Parses, merges and redraws. On a parse error nothing is touched.
    fn handle_message(&mut self, text: &str) -> FeedResult<Vec<String>> {
        let column = Column::parse(text)?;
        let changed = self.registry.apply_column(&column);
        debug!("Column updated {:?}", changed);
        self.redraw();
        Ok(changed)
    }

    /// Connects to `uri` and pumps events until the stream closes or fails.
    ///
    /// Fails only when the socket cannot be opened; errors after that are logged
    /// and reflected in the returned state. There is no automatic reconnect.
    pub async fn run(&mut self, uri: Option<&str>) -> FeedResult<StreamState> {
        let uri = self.begin_connect(uri)?;

        let (ws_stream, _) = match connect_async(uri.as_str()).await {
            Ok(conn) => conn,
            Err(e) => return Err(self.connect_failed(&uri, e.to_string())),
        };
        let (mut write, mut read) = ws_stream.split();

        if let Some(hello) = self.handle_event(StreamEvent::Opened) {
            if let Err(e) = write.send(Message::Text(hello)).await {
                self.handle_event(StreamEvent::Error(e.to_string()));
                return Ok(self.state);
            }
        }

        while self.state == StreamState::Open {
            let event = match read.next().await {
                Some(Ok(Message::Text(text))) => StreamEvent::Message(text),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => StreamEvent::Message(text),
                    Err(e) => {
                        warn!("{}", FeedError::Parse(e.to_string()));
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    if let Some(frame) = frame {
                        debug!("Close frame: {} {}", frame.code, frame.reason);
                    }
                    StreamEvent::Closed
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => StreamEvent::Error(e.to_string()),
                None => StreamEvent::Closed,
            };

            if let Some(reply) = self.handle_event(event) {
                if let Err(e) = write.send(Message::Text(reply)).await {
                    self.handle_event(StreamEvent::Error(e.to_string()));
                }
            }
        }

        // Flushes the queued close reply so the peer sees a clean handshake.
        if self.state == StreamState::Closed {
            if let Err(e) = write.close().await {
                debug!("Close handshake not completed: {}", e);
            }
        }

        Ok(self.state)
    }
}
