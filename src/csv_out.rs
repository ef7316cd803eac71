use crate::errors::AppError;
use crate::model::Log;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;

/// One line of a SOTA database v2 upload.
#[derive(Debug, Serialize)]
struct SotaRow<'a> {
    version: &'static str,
    my_callsign: &'a str,
    my_summit: &'a str,
    date: String,
    time: String,
    frequency: &'a str,
    mode: &'static str,
    his_callsign: &'a str,
    his_summit: &'a str,
    notes: &'a str,
}

/// Write every contact of the log as SOTA v2 CSV, activations in stream order. The file has no
/// header row.
pub fn write_sota_csv<W: Write>(log: &Log, out: W) -> Result<usize, AppError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);

    let mut count = 0;
    for (activation, qso) in log.records() {
        wtr.serialize(SotaRow {
            version: "V2",
            my_callsign: &activation.callsign,
            my_summit: &activation.sota_ref,
            date: activation.date_of(qso).format("%d/%m/%Y").to_string(),
            time: qso.time.to_string(),
            frequency: &qso.frequency.label,
            mode: qso.mode.label(),
            his_callsign: &qso.callsign,
            his_summit: qso.sota_ref.as_deref().unwrap_or(""),
            notes: &qso.notes,
        })
        .map_err(|e| AppError::Output(format!("csv write row: {}", e)))?;
        count += 1;
    }

    wtr.flush().map_err(|e| AppError::IO(format!("csv flush: {}", e)))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::parse_str;

    fn render(input: &str) -> String {
        let log = parse_str(input).unwrap();
        let mut buf = Vec::new();
        write_sota_csv(&log, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn activation_rows() {
        let out = render(
            "YO3XYZ 2024-06-01 YO/EC-001\n\
             0905 W1ABC 14.250 SSB 57 55 nice, loud\n\
             10 DL1AA/P 7.130 DL/AL-001\n",
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "V2,YO3XYZ,YO/EC-001,01/06/2024,0905,14.250MHz,SSB,W1ABC,,\"nice, loud\""
        );
        assert_eq!(lines[1], "V2,YO3XYZ,YO/EC-001,01/06/2024,0910,7.130MHz,SSB,DL1AA/P,DL/AL-001,");
    }

    #[test]
    fn chase_rows_and_day_rollover() {
        let out = render(
            "YO3XYZ 2024-12-31 *\n\
             2350 W1ABC/P 14.062 CW W1/HA-001\n\
             0010 W2DEF/P\n",
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "V2,YO3XYZ,,31/12/2024,2350,14.062MHz,CW,W1ABC/P,W1/HA-001,");
        assert_eq!(lines[1], "V2,YO3XYZ,,01/01/2025,0010,14.062MHz,CW,W2DEF/P,W1/HA-001,");
    }
}
