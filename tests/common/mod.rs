//! Shared fixtures: generated PDFs, a scripted chat client and a one-shot HTTP server

#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use resume_screener::llm::client::ChatClient;
use resume_screener::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A PDF with one page per entry, each page showing its string.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    save(document_with_pages(pages))
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn document_with_pages(pages: &[&str]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Same pages, encrypted with the standard handler (RC4, 40-bit, revision 2).
///
/// An empty `user_password` gives the owner-password-only kind of file that
/// any reader opens without prompting.
pub fn encrypted_pdf_with_pages(pages: &[&str], user_password: &str) -> Vec<u8> {
    let mut doc = document_with_pages(pages);

    let file_id = b"resume-screener!".to_vec();
    doc.trailer.set(
        "ID",
        vec![
            Object::String(file_id.clone(), StringFormat::Hexadecimal),
            Object::String(file_id, StringFormat::Hexadecimal),
        ],
    );
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "P" => -4,
        "O" => Object::String(vec![0x5A; 32], StringFormat::Hexadecimal),
    });
    doc.trailer.set("Encrypt", encrypt_id);

    let key = get_encryption_key(&doc, user_password, false).unwrap();
    let user_check = rc4(&key, &PASSWORD_PAD);
    doc.get_object_mut(encrypt_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("U", Object::String(user_check, StringFormat::Hexadecimal));

    // RC4 is symmetric, so "decrypting" plain content encrypts it.
    for (&id, object) in doc.objects.iter_mut() {
        if let Object::Stream(stream) = object {
            let sealed = decrypt_object(&key, id, &Object::Stream(stream.clone())).unwrap();
            stream.set_content(sealed);
        }
    }

    save(doc)
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state: Vec<u8> = (0..=255).collect();
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[i as usize]);
            state.swap(i as usize, j as usize);
            byte ^ state[state[i as usize].wrapping_add(state[j as usize]) as usize]
        })
        .collect()
}

/// Chat client substitute that records every message it is sent.
pub struct ScriptedClient {
    pub calls: Arc<AtomicUsize>,
    pub messages: Arc<Mutex<Vec<String>>>,
    reply: String,
}

impl ScriptedClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            messages: Arc::new(Mutex::new(Vec::new())),
            reply: reply.to_string(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn send(&self, user_message: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(user_message.to_string());
        Ok(self.reply.clone())
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Serve the given `(status line, JSON body)` pairs, one connection each, and
/// hand back the raw requests that arrived.
pub async fn serve(responses: Vec<(&'static str, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
        }
        requests
    });

    (format!("http://127.0.0.1:{}", port), handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// JSON body of a captured request.
pub fn request_json(request: &str) -> serde_json::Value {
    let body_start = request.find("\r\n\r\n").unwrap() + 4;
    serde_json::from_str(&request[body_start..]).unwrap()
}
