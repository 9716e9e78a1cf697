use once_cell::sync::Lazy;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;
use tramline::{AttrKind, Fields, Record, Schema};

/// Base schema shared by every record that tracks its save times
pub static TIMESTAMPED: Lazy<Schema> = Lazy::new(|| {
    Schema::new("timestamped")
        .attribute("created_at", AttrKind::Integer)
        .attribute("updated_at", AttrKind::Integer)
});

pub static TODO: Lazy<Schema> = Lazy::new(|| {
    TIMESTAMPED
        .extend("todo")
        .attribute("title", AttrKind::String)
        .attribute("completed", AttrKind::Boolean)
});

#[derive(Debug, Clone)]
pub struct Todo {
    fields: Fields,
}

impl Todo {
    /// Attributes stamped by `before_save`, never taken from a client.
    pub const TIMESTAMPS: [&'static str; 2] = ["created_at", "updated_at"];

    /// Unsaved todo with a preassigned identity, for fixtures.
    pub fn with_id(id: &str, title: &str, completed: bool) -> tramline::Result<Self> {
        let mut todo = Self::from_fields(Fields::with_id(&TODO, id));
        todo.set("title", title)?;
        todo.set("completed", completed)?;
        Ok(todo)
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get_str("title")
    }

    /// Absent means not completed.
    pub fn completed(&self) -> bool {
        self.fields.get_bool("completed").unwrap_or(false)
    }

    /// Milliseconds since the Unix epoch of the first save
    pub fn created_at(&self) -> Option<i64> {
        self.fields.get_i64("created_at")
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.fields.get_i64("updated_at")
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

impl Record for Todo {
    fn schema() -> &'static Schema {
        &TODO
    }

    fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    fn fields(&self) -> &Fields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    fn before_save(&mut self) {
        let now = now_millis();
        let created = self.created_at().unwrap_or(now);
        for (name, value) in Self::TIMESTAMPS.into_iter().zip([created, now]) {
            if let Err(err) = self.fields.set(name, value) {
                warn!(error = %err, attribute = name, "Failed to stamp todo");
            }
        }
    }
}
