//! Editable projection of the server's user list.
//!
//! [`TableState`] is a plain value: [`TableState::reduce`] takes the current
//! state and an action and returns the next state. At most one row is in
//! [`RowMode::Edit`] at a time.

use serde::{Deserialize, Serialize};

/// The three editable user fields as the operator sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

impl UserFields {
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.firstname,
            Field::LastName => &self.lastname,
            Field::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.firstname,
            Field::LastName => &mut self.lastname,
            Field::Email => &mut self.email,
        };
        *slot = value.into();
    }
}

/// A user as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: UserFields,
}

/// Names of the editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
}

/// Fields whose draft differs from the last-known-good value.
///
/// Serialises to a partial update body with absent fields omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl FieldChanges {
    pub fn is_empty(&self) -> bool {
        self.firstname.is_none() && self.lastname.is_none() && self.email.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    View,
    Edit,
}

/// One table row: the committed value plus the operator's draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: String,
    saved: UserFields,
    draft: UserFields,
}

impl Row {
    fn from_record(record: UserRecord) -> Self {
        Self {
            id: record.id,
            draft: record.fields.clone(),
            saved: record.fields,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Last-known-good values.
    pub fn saved(&self) -> &UserFields {
        &self.saved
    }

    /// Values currently shown in the row inputs.
    pub fn draft(&self) -> &UserFields {
        &self.draft
    }

    /// Diff of the draft against the saved values.
    pub fn changes(&self) -> FieldChanges {
        let changed = |field: Field| {
            let draft = self.draft.get(field);
            (draft != self.saved.get(field)).then(|| draft.to_owned())
        };
        FieldChanges {
            firstname: changed(Field::FirstName),
            lastname: changed(Field::LastName),
            email: changed(Field::Email),
        }
    }

    fn revert(&mut self) {
        self.draft = self.saved.clone();
    }
}

/// Inputs to [`TableState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    /// Replace every row with a fresh server listing.
    Loaded(Vec<UserRecord>),
    /// Put a row in edit mode, reverting any other row being edited.
    BeginEdit(String),
    /// Change one draft field of the row being edited.
    Input {
        id: String,
        field: Field,
        value: String,
    },
    /// Revert the edited row and return it to view mode.
    Cancel,
    /// The server accepted an update; store it as the new saved value.
    Committed(UserRecord),
    /// The server confirmed a delete.
    Removed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    rows: Vec<Row>,
    editing: Option<String>,
}

impl TableState {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Identifier of the row in edit mode, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn mode(&self, id: &str) -> RowMode {
        if self.editing() == Some(id) {
            RowMode::Edit
        } else {
            RowMode::View
        }
    }

    /// Changes pending on the edited row; `None` when nothing is edited.
    pub fn changed_fields(&self) -> Option<FieldChanges> {
        self.editing().and_then(|id| self.row(id)).map(Row::changes)
    }

    fn row_mut(&mut self, id: &str) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    fn leave_edit(&mut self) {
        if let Some(id) = self.editing.take() {
            if let Some(row) = self.row_mut(&id) {
                row.revert();
            }
        }
    }

    /// Compute the state that follows `action`.
    ///
    /// # Examples
    /// ```
    /// use user_directory::client::table::{
    ///     Field, RowMode, TableAction, TableState, UserFields, UserRecord,
    /// };
    ///
    /// let record = UserRecord {
    ///     id: "a".into(),
    ///     fields: UserFields::new("Jo", "Li", "jo@x.com"),
    /// };
    /// let state = TableState::default()
    ///     .reduce(TableAction::Loaded(vec![record]))
    ///     .reduce(TableAction::BeginEdit("a".into()))
    ///     .reduce(TableAction::Input {
    ///         id: "a".into(),
    ///         field: Field::FirstName,
    ///         value: "Jon".into(),
    ///     });
    /// assert_eq!(state.mode("a"), RowMode::Edit);
    /// let changes = state.changed_fields().expect("row in edit");
    /// assert_eq!(changes.firstname.as_deref(), Some("Jon"));
    /// assert!(changes.email.is_none());
    /// ```
    #[must_use]
    pub fn reduce(mut self, action: TableAction) -> Self {
        match action {
            TableAction::Loaded(records) => {
                self.rows = records.into_iter().map(Row::from_record).collect();
                self.editing = None;
            }
            TableAction::BeginEdit(id) => {
                if self.editing.as_deref() != Some(id.as_str()) && self.row(&id).is_some() {
                    self.leave_edit();
                    self.editing = Some(id);
                }
            }
            TableAction::Input { id, field, value } => {
                if self.editing.as_deref() == Some(id.as_str()) {
                    if let Some(row) = self.row_mut(&id) {
                        row.draft.set(field, value);
                    }
                }
            }
            TableAction::Cancel => self.leave_edit(),
            TableAction::Committed(record) => {
                if self.editing.as_deref() == Some(record.id.as_str()) {
                    self.editing = None;
                }
                if let Some(row) = self.row_mut(&record.id) {
                    *row = Row::from_record(record);
                }
            }
            TableAction::Removed(id) => {
                self.rows.retain(|row| row.id != id);
                if self.editing.as_deref() == Some(id.as_str()) {
                    self.editing = None;
                }
            }
        }
        self
    }
}
