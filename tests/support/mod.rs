//! Scripted POP3 server shared by the integration tests
//!
//! Serves exactly one connection: sends its greeting, then walks through
//! the scripted exchanges in order, asserting that each command received
//! is the one the script expects. After the script runs out, further
//! client lines are drained without a reply; awaiting the join handle
//! surfaces any script violation as a test failure.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use pop3_client::ClientConfig;

struct Exchange {
    expect: &'static str,
    reply: Vec<u8>,
}

pub struct ScriptedServer {
    greeting: String,
    exchanges: Vec<Exchange>,
}

impl ScriptedServer {
    /// A server that will open the conversation with this greeting line
    pub fn new(greeting: &str) -> Self {
        Self {
            greeting: format!("{}\r\n", greeting),
            exchanges: Vec::new(),
        }
    }

    /// Expect `command` next, answer with a single response line
    pub fn expect(mut self, command: &'static str, reply: &str) -> Self {
        self.exchanges.push(Exchange {
            expect: command,
            reply: format!("{}\r\n", reply).into_bytes(),
        });
        self
    }

    /// Expect `command` next, answer with raw bytes (for payload replies,
    /// which span multiple lines)
    pub fn expect_raw(mut self, command: &'static str, reply: &[u8]) -> Self {
        self.exchanges.push(Exchange {
            expect: command,
            reply: reply.to_vec(),
        });
        self
    }

    /// Bind, serve one connection in the background, and return the
    /// client config pointing at it plus the join handle
    pub async fn spawn(self) -> (ClientConfig, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);

            reader.write_all(self.greeting.as_bytes()).await.unwrap();

            for exchange in self.exchanges {
                let mut line = String::new();
                let n = reader.read_line(&mut line).await.unwrap();
                assert!(
                    n > 0,
                    "client hung up before sending {:?}",
                    exchange.expect
                );
                assert_eq!(
                    line.trim_end_matches(['\r', '\n']),
                    exchange.expect,
                    "client sent an unexpected command"
                );
                reader.write_all(&exchange.reply).await.unwrap();
            }

            // Past the script: swallow whatever else arrives (QUIT, etc.)
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) | Err(_) => return,
                    Ok(_) => {}
                }
            }
        });

        (ClientConfig::new("127.0.0.1", port), handle)
    }
}
