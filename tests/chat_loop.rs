use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use newcomers_chat::chat_loop;
use newcomers_chat::client::{ ByteStream, ChatBackend };
use newcomers_chat::error::ChatError;
use newcomers_chat::session::Session;
use newcomers_chat::ui::terminal::TerminalView;
use std::sync::{ Arc, Mutex };

/// Replies with a fixed body, split into the given byte chunks.
struct ScriptedBackend {
    chunks: Vec<Vec<u8>>,
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn create_conversation(&self) -> Result<String, ChatError> {
        Ok("conv-loop".to_string())
    }

    async fn send_message(&self, _: &str, content: &str) -> Result<ByteStream, ChatError> {
        self.sent.lock().unwrap().push(content.to_string());
        let parts: Vec<Result<Bytes, ChatError>> = self.chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.clone())))
            .collect();
        Ok(Box::pin(stream::iter(parts)))
    }
}

fn split_every(body: &str, size: usize) -> Vec<Vec<u8>> {
    body.as_bytes()
        .chunks(size)
        .map(|c| c.to_vec())
        .collect()
}

#[tokio::test]
async fn loop_sends_each_line_until_quit() {
    let body =
        "data: {\"type\":\"chunk\",\"content\":\"Bienvenue à Calgary\"}\n\
         data: {\"type\":\"done\",\"message\":{\"id\":\"srv\",\"role\":\"assistant\",\"content\":\"Bienvenue à Calgary\",\"timestamp\":1}}\n";
    // Three-byte pieces split both lines and the two-byte 'à'.
    let backend = Arc::new(ScriptedBackend {
        chunks: split_every(body, 3),
        sent: Mutex::new(Vec::new()),
    });
    let mut session = Session::new(backend.clone());
    assert!(session.initialize().await);

    let mut view = TerminalView::new(Vec::new(), false);
    let input: &[u8] = b"Hello\n\n   \n/quit\nnever sent\n";
    chat_loop(&mut session, &mut view, input).await.unwrap();

    assert_eq!(*backend.sent.lock().unwrap(), vec!["Hello".to_string()]);
    assert_eq!(session.messages().len(), 2);
    assert_eq!(session.messages()[1].content, "Bienvenue à Calgary");
    assert_eq!(session.messages()[1].id, "srv");

    let screen = String::from_utf8(view.into_inner()).unwrap();
    assert!(screen.contains("Assistant: Bienvenue à Calgary\n\n"));
}

#[tokio::test]
async fn loop_ends_at_eof() {
    let backend = Arc::new(ScriptedBackend {
        chunks: vec![b"data: {\"type\":\"chunk\",\"content\":\"ok\"}".to_vec()],
        sent: Mutex::new(Vec::new()),
    });
    let mut session = Session::new(backend.clone());
    session.initialize().await;

    let mut view = TerminalView::new(Vec::new(), false);
    let input: &[u8] = b"first\nsecond";
    chat_loop(&mut session, &mut view, input).await.unwrap();

    assert_eq!(backend.sent.lock().unwrap().len(), 2);
    assert_eq!(session.messages().len(), 4);
    assert_eq!(session.messages()[3].content, "ok");
}

#[tokio::test]
async fn undecodable_line_does_not_end_session() {
    let backend = Arc::new(ScriptedBackend {
        chunks: vec![b"data: {\"type\":\"chunk\",\"content\":\"ok\"}\n".to_vec()],
        sent: Mutex::new(Vec::new()),
    });
    let mut session = Session::new(backend.clone());
    session.initialize().await;

    let mut view = TerminalView::new(Vec::new(), false);
    let input: &[u8] = b"caf\xe9\nHello\n";
    chat_loop(&mut session, &mut view, input).await.unwrap();

    assert_eq!(
        *backend.sent.lock().unwrap(),
        vec!["caf\u{FFFD}".to_string(), "Hello".to_string()]
    );
    assert_eq!(session.messages().len(), 4);
}

#[tokio::test]
async fn history_command_prints_snapshot_without_sending() {
    let backend = Arc::new(ScriptedBackend {
        chunks: vec![b"data: {\"type\":\"chunk\",\"content\":\"Hi\"}\n".to_vec()],
        sent: Mutex::new(Vec::new()),
    });
    let mut session = Session::new(backend.clone());
    session.initialize().await;

    let mut view = TerminalView::new(Vec::new(), false);
    let input: &[u8] = b"Hello\n/history\n";
    chat_loop(&mut session, &mut view, input).await.unwrap();

    assert_eq!(backend.sent.lock().unwrap().len(), 1);
    let screen = String::from_utf8(view.into_inner()).unwrap();
    assert!(screen.contains("Conversation conv-loop (2 turns)\n  You: Hello\n  Assistant: Hi\n"));
}
