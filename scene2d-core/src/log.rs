// Copyright (c) 2019-present Dmitry Stepanov and Fyrox Engine contributors.
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Simple logger. By default, it writes in the console only. To enable logging into a file, call
//! [`Log::set_file_name`] somewhere in your `main` function.

use crate::{instant::Instant, parking_lot::Mutex};
use lazy_static::lazy_static;
use std::{
    fmt::Debug,
    io::{self, Write},
    path::Path,
    sync::mpsc::Sender,
    time::Duration,
};

/// A message that could be sent by the logger to all listeners.
#[derive(Debug, Clone)]
pub struct LogMessage {
    /// Kind of the message: information, warning or error.
    pub kind: MessageKind,
    /// The source message without logger prefixes.
    pub content: String,
    /// Time point at which the message was recorded, relative to the moment when the logger
    /// was initialized.
    pub time: Duration,
}

lazy_static! {
    static ref LOG: Mutex<Log> = Mutex::new(Log {
        file: None,
        verbosity: MessageKind::Information,
        listeners: Default::default(),
        time_origin: Instant::now(),
    });
}

/// A kind of message.
#[derive(Debug, Default, Copy, Clone, PartialOrd, PartialEq, Eq, Ord, Hash)]
#[repr(u32)]
pub enum MessageKind {
    /// Some useful information.
    #[default]
    Information = 0,
    /// A warning.
    Warning = 1,
    /// An error of some kind.
    Error = 2,
}

impl MessageKind {
    fn as_str(self) -> &'static str {
        match self {
            MessageKind::Information => "[INFO]: ",
            MessageKind::Warning => "[WARNING]: ",
            MessageKind::Error => "[ERROR]: ",
        }
    }
}

/// See module docs.
pub struct Log {
    file: Option<std::fs::File>,
    verbosity: MessageKind,
    listeners: Vec<Sender<LogMessage>>,
    time_origin: Instant,
}

impl Log {
    /// Creates a new log file at the specified path.
    pub fn set_file_name<P: AsRef<Path>>(path: P) {
        LOG.lock().file = std::fs::File::create(path).ok();
    }

    fn write_internal(&mut self, kind: MessageKind, message: &str) {
        if kind < self.verbosity {
            return;
        }

        let time = Instant::now() - self.time_origin;

        // Disconnected listeners are dropped on the first failed send.
        self.listeners.retain(|listener| {
            listener
                .send(LogMessage {
                    kind,
                    content: message.to_owned(),
                    time,
                })
                .is_ok()
        });

        let mut line = String::with_capacity(message.len() + 16);
        line.push_str(kind.as_str());
        line.push_str(message);
        line.push('\n');

        let _ = io::stdout().write_all(line.as_bytes());

        if let Some(file) = self.file.as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }

    /// Writes a line to the console and optionally into the file (if set).
    pub fn writeln<S>(kind: MessageKind, msg: S)
    where
        S: AsRef<str>,
    {
        LOG.lock().write_internal(kind, msg.as_ref());
    }

    /// Writes an information message.
    pub fn info<S>(msg: S)
    where
        S: AsRef<str>,
    {
        Self::writeln(MessageKind::Information, msg)
    }

    /// Writes a warning message.
    pub fn warn<S>(msg: S)
    where
        S: AsRef<str>,
    {
        Self::writeln(MessageKind::Warning, msg)
    }

    /// Writes an error message.
    pub fn err<S>(msg: S)
    where
        S: AsRef<str>,
    {
        Self::writeln(MessageKind::Error, msg)
    }

    /// Sets verbosity level. Messages with lower severity are dropped.
    pub fn set_verbosity(kind: MessageKind) {
        LOG.lock().verbosity = kind;
    }

    /// Returns current verbosity level.
    pub fn verbosity() -> MessageKind {
        LOG.lock().verbosity
    }

    /// Adds a listener that will receive a copy of every message passed into the log.
    pub fn add_listener(listener: Sender<LogMessage>) {
        LOG.lock().listeners.push(listener)
    }

    /// Prints the error of the result into the log, if any.
    pub fn verify<T, E>(result: Result<T, E>)
    where
        E: Debug,
    {
        if let Err(e) = result {
            Self::err(format!("Operation failed! Reason: {e:?}"));
        }
    }
}
