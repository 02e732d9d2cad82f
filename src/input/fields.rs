use super::{FieldValue, InputError, InputRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    Present(String),
    Missing {
        requested: String,
        available: Vec<String>,
    },
}

/// The two fields a run reads from every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSelection {
    pub channel_field: String,
    pub members_field: String,
}

/// Checks a field name against the first record's field set.
pub fn validate_field(records: &[InputRecord], requested: &str) -> FieldSelection {
    let available: Vec<String> = records
        .first()
        .map(|record| {
            record
                .field_names()
                .into_iter()
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();
    if available.iter().any(|name| name == requested) {
        FieldSelection::Present(requested.to_string())
    } else {
        FieldSelection::Missing {
            requested: requested.to_string(),
            available,
        }
    }
}

/// A record whose channel and member fields have been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedRecord<'a> {
    pub channel: &'a str,
    pub members: &'a FieldValue,
}

/// Pulls the selected fields out of every record before any remote call.
///
/// The first record missing a field, or carrying a list as its channel name,
/// stops the whole run.
pub fn select_records<'a>(
    records: &'a [InputRecord],
    selection: &RecordSelection,
) -> Result<Vec<SelectedRecord<'a>>, InputError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let channel = match record.get(&selection.channel_field) {
                Some(FieldValue::Delimited(name)) => name.as_str(),
                Some(FieldValue::Sequence(_)) => {
                    return Err(InputError::ChannelNotText {
                        index,
                        field: selection.channel_field.clone(),
                    })
                }
                None => {
                    return Err(InputError::MissingField {
                        index,
                        field: selection.channel_field.clone(),
                    })
                }
            };
            let members =
                record
                    .get(&selection.members_field)
                    .ok_or_else(|| InputError::MissingField {
                        index,
                        field: selection.members_field.clone(),
                    })?;
            Ok(SelectedRecord { channel, members })
        })
        .collect()
}
