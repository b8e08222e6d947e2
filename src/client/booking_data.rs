//! The `data` query parameter that carries selected seats from the seat
//! picker to the checkout page: a JSON array of [`BookingData`].

use thiserror::Error;

use crate::models::BookingData;

pub const DATA_PARAM: &str = "data";

#[derive(Debug, Error, PartialEq)]
pub enum BookingDataError {
    #[error("query has no `data` parameter")]
    Missing,
    #[error("`data` parameter is not valid booking data: {0}")]
    Malformed(String),
    #[error("no seats selected")]
    Empty,
}

pub fn encode_query(items: &[BookingData]) -> Result<String, BookingDataError> {
    let json = serde_json::to_string(items).map_err(|e| BookingDataError::Malformed(e.to_string()))?;
    serde_urlencoded::to_string([(DATA_PARAM, json)]).map_err(|e| BookingDataError::Malformed(e.to_string()))
}

pub fn decode_query(query: &str) -> Result<Vec<BookingData>, BookingDataError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.trim_start_matches('?'))
        .map_err(|e| BookingDataError::Malformed(e.to_string()))?;

    let json = pairs
        .into_iter()
        .find(|(key, _)| key == DATA_PARAM)
        .map(|(_, value)| value)
        .ok_or(BookingDataError::Missing)?;

    let items: Vec<BookingData> =
        serde_json::from_str(&json).map_err(|e| BookingDataError::Malformed(e.to_string()))?;
    if items.is_empty() {
        return Err(BookingDataError::Empty);
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_what_the_seat_picker_sends() {
        let query = "?data=%5B%7B%22row%22%3A1%2C%22column%22%3A4%2C%22price%22%3A45000%7D%5D";
        let items = decode_query(query).unwrap();
        assert_eq!(items, vec![BookingData { row: 1, column: 4, price: 45_000.0 }]);
    }

    #[test]
    fn encoded_query_decodes_back() {
        let items = vec![
            BookingData { row: 2, column: 1, price: 50_000.0 },
            BookingData { row: 2, column: 2, price: 50_000.0 },
        ];
        let query = encode_query(&items).unwrap();
        assert!(query.starts_with("data="));
        assert_eq!(decode_query(&query).unwrap(), items);
    }

    #[test]
    fn rejects_missing_empty_and_garbage() {
        assert_eq!(decode_query("page=2"), Err(BookingDataError::Missing));
        assert_eq!(decode_query("data=%5B%5D"), Err(BookingDataError::Empty));
        assert!(matches!(decode_query("data=nope"), Err(BookingDataError::Malformed(_))));
    }
}
