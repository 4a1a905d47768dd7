use std::fmt;

use crate::error::FrameError;

// ---------------------------------------------------------------------------
// Frame – one validated sensor reading
// ---------------------------------------------------------------------------

/// One reading of every bin. Always holds exactly the configured bin count;
/// the only ways to build one check the length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    values: Vec<u32>,
}

impl Frame {
    /// Wrap already-parsed values, checking the bin count.
    pub fn from_values(values: Vec<u32>, bins: usize) -> Result<Self, FrameError> {
        if values.len() != bins {
            return Err(FrameError::WrongLength {
                expected: bins,
                found: values.len(),
            });
        }
        Ok(Frame { values })
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the bins as floats, the form every downstream stage works in.
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().map(|&v| v as f64)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Wire grammar:  <marker>,<int>,<int>,...,<int>
// ---------------------------------------------------------------------------

/// Parse one raw wire line into a frame of `bins` values.
///
/// Field 0 must equal `marker`; every following field must be a base-10
/// non-negative integer. Whitespace around fields (including the line
/// terminator) is ignored.
pub fn parse_line(line: &str, marker: &str, bins: usize) -> Result<Frame, FrameError> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split(',');

    match fields.next() {
        Some(first) if first.trim() == marker => {}
        _ => {
            return Err(FrameError::MissingMarker {
                marker: marker.to_string(),
            })
        }
    }

    let values = fields
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<u32>()
                .map_err(|_| FrameError::NotAnInteger {
                    position: j + 1,
                    field: tok.to_string(),
                })
        })
        .collect::<Result<Vec<u32>, FrameError>>()?;

    Frame::from_values(values, bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields_in_order() {
        let frame = parse_line("start,3,0,17,255\n", "start", 4).unwrap();
        assert_eq!(frame.values(), &[3, 0, 17, 255]);
        assert_eq!(frame.len(), 4);
    }

    #[test]
    fn tolerates_carriage_return_and_padding() {
        let frame = parse_line("start, 1 ,2,3\r\n", "start", 3).unwrap();
        assert_eq!(frame.values(), &[1, 2, 3]);
    }

    #[test]
    fn rejects_missing_or_partial_marker() {
        for line in ["1,2,3", "art,1,2,3", "", "\n", "starting,1,2,3"] {
            assert_eq!(
                parse_line(line, "start", 3),
                Err(FrameError::MissingMarker {
                    marker: "start".into()
                }),
                "line {line:?}"
            );
        }
    }

    #[test]
    fn rejects_non_integer_fields() {
        let err = parse_line("start,1,x,3", "start", 3).unwrap_err();
        assert_eq!(
            err,
            FrameError::NotAnInteger {
                position: 2,
                field: "x".into()
            }
        );
        assert!(parse_line("start,1,2.5,3", "start", 3).is_err());
        assert!(parse_line("start,1,-2,3", "start", 3).is_err());
        assert!(parse_line("start,1,,3", "start", 3).is_err());
    }

    #[test]
    fn rejects_wrong_arity() {
        assert_eq!(
            parse_line("start,1,2", "start", 3),
            Err(FrameError::WrongLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse_line("start,1,2,3,4", "start", 3),
            Err(FrameError::WrongLength {
                expected: 3,
                found: 4
            })
        );
    }

    #[test]
    fn from_values_checks_length() {
        assert!(Frame::from_values(vec![1, 2], 2).is_ok());
        assert!(Frame::from_values(vec![1, 2], 3).is_err());
    }

    #[test]
    fn displays_as_list() {
        let frame = Frame::from_values(vec![1, 20, 300], 3).unwrap();
        assert_eq!(frame.to_string(), "[1, 20, 300]");
    }
}
