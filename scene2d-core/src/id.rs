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

//! Monotonic id generation.

use std::{
    fmt::{Debug, Formatter},
    marker::PhantomData,
};

/// Hands out strictly increasing ids, starting from zero. Ids are never reused. The generator is
/// meant to be owned by whatever object composes a subsystem, so uniqueness is scoped to that
/// owner instead of being hidden global state.
pub struct IdGenerator<T> {
    next: u64,
    type_marker: PhantomData<fn() -> T>,
}

impl<T> Default for IdGenerator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for IdGenerator<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdGenerator {{ next: {} }}", self.next)
    }
}

impl<T> IdGenerator<T> {
    pub fn new() -> Self {
        Self {
            next: 0,
            type_marker: PhantomData,
        }
    }

    /// Amount of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

impl<T: From<u64>> IdGenerator<T> {
    /// Returns a fresh id.
    pub fn next_id(&mut self) -> T {
        let id = self.next;
        self.next += 1;
        T::from(id)
    }
}
