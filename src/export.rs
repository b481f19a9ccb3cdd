//! Export distance results as JSON, CSV, plain text, HTML or XML.

use crate::distance::DistanceType;
use crate::engine::CalculationPair;
use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
    Html,
    Xml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Xml => "xml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" => Ok(ExportFormat::Txt),
            "html" => Ok(ExportFormat::Html),
            "xml" => Ok(ExportFormat::Xml),
            other => Err(AnalysisError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Results handed back by a client for export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_pairs: Option<Vec<CalculationPair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculation_type: Option<DistanceType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedResults {
    pub format: ExportFormat,
    pub data: String,
    pub filename: String,
}

pub fn export(results: &ExportResults, format: ExportFormat) -> Result<ExportedResults> {
    let data = match format {
        ExportFormat::Json => to_json(results)?,
        ExportFormat::Csv => to_csv(results),
        ExportFormat::Txt => to_txt(results),
        ExportFormat::Html => to_html(results),
        ExportFormat::Xml => to_xml(results),
    };

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(ExportedResults {
        format,
        data,
        filename: format!("distance_analysis_{}.{}", stamp, format.extension()),
    })
}

fn to_json(results: &ExportResults) -> Result<String> {
    let document = serde_json::json!({
        "export_info": { "format": "json", "version": "1.0" },
        "results": results,
    });
    serde_json::to_string_pretty(&document)
        .map_err(|e| AnalysisError::validation(format!("cannot serialize results: {}", e)))
}

fn to_csv(results: &ExportResults) -> String {
    let mut out = String::new();

    if let Some(matrix) = &results.distances {
        let header: Vec<String> = std::iter::once("Point".to_string())
            .chain((0..matrix.len()).map(|i| format!("P{}", i)))
            .collect();
        let _ = writeln!(out, "{}", header.join(","));
        for (i, row) in matrix.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            let _ = writeln!(out, "P{},{}", i, cells.join(","));
        }
    } else if let Some(pairs) = &results.calculation_pairs {
        out.push_str("Point_A_Index,Point_B_Index,Distance\n");
        for pair in pairs {
            let [a, b] = pair.point_indices;
            let _ = writeln!(out, "{},{},{}", a, b, pair.distance);
        }
    } else {
        out.push_str("Key,Value\n");
        if let Some(metric) = results.calculation_type {
            let _ = writeln!(out, "calculation_type,{}", metric);
        }
    }
    out
}

fn to_txt(results: &ExportResults) -> String {
    let mut lines = vec![
        "DISTANCE ANALYSIS RESULTS".to_string(),
        "=".repeat(50),
    ];
    if let Some(metric) = results.calculation_type {
        lines.push(format!("Calculation Type: {}", metric));
    }

    if let Some(matrix) = &results.distances {
        lines.push(String::new());
        lines.push("DISTANCE MATRIX:".to_string());
        lines.push("-".repeat(30));
        let header: String = (0..matrix.len()).map(|i| format!("{:>9}", format!("P{}", i))).collect();
        lines.push(format!("     {}", header));
        for (i, row) in matrix.iter().enumerate() {
            let cells: String = row.iter().map(|v| format!("{:>9.3}", v)).collect();
            lines.push(format!("{:<5}{}", format!("P{}", i), cells));
        }
    }

    if let Some(pairs) = &results.calculation_pairs {
        lines.push(String::new());
        lines.push("CALCULATION PAIRS:".to_string());
        lines.push("-".repeat(30));
        for pair in pairs {
            let [a, b] = pair.point_indices;
            lines.push(format!("P{} <-> P{}: {:.6}", a, b, pair.distance));
        }
    }

    lines.join("\n")
}

fn to_html(results: &ExportResults) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html><head>\n<title>Distance Analysis Results</title>\n\
         <style>\nbody { font-family: Arial, sans-serif; margin: 20px; }\n\
         table { border-collapse: collapse; margin: 20px 0; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: center; }\n\
         th { background-color: #f2f2f2; }\n</style>\n</head><body>\n\
         <h1>Distance Analysis Results</h1>\n",
    );
    if let Some(metric) = results.calculation_type {
        let _ = writeln!(html, "<p><strong>Calculation Type:</strong> {}</p>", metric);
    }

    if let Some(matrix) = &results.distances {
        html.push_str("<h2>Distance Matrix</h2>\n<table>\n<tr><th>Point</th>");
        for i in 0..matrix.len() {
            let _ = write!(html, "<th>P{}</th>", i);
        }
        html.push_str("</tr>\n");
        for (i, row) in matrix.iter().enumerate() {
            let _ = write!(html, "<tr><td><strong>P{}</strong></td>", i);
            for v in row {
                let _ = write!(html, "<td>{:.6}</td>", v);
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
    }

    if let Some(pairs) = &results.calculation_pairs {
        html.push_str(
            "<h2>Calculation Pairs</h2>\n<table>\n\
             <tr><th>Point A</th><th>Point B</th><th>Distance</th></tr>\n",
        );
        for pair in pairs {
            let [a, b] = pair.point_indices;
            let _ = writeln!(
                html,
                "<tr><td>P{}</td><td>P{}</td><td>{:.6}</td></tr>",
                a, b, pair.distance
            );
        }
        html.push_str("</table>\n");
    }

    html.push_str("</body></html>");
    html
}

fn to_xml(results: &ExportResults) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<distance_analysis_results>\n\
         <metadata><format>xml</format><version>1.0</version></metadata>\n<results>\n",
    );
    if let Some(metric) = results.calculation_type {
        let _ = writeln!(xml, "<calculation_type>{}</calculation_type>", metric);
    }

    if let Some(matrix) = &results.distances {
        xml.push_str("<distance_matrix>\n");
        for (i, row) in matrix.iter().enumerate() {
            let _ = write!(xml, "<row index=\"{}\">", i);
            for v in row {
                let _ = write!(xml, "<value>{}</value>", v);
            }
            xml.push_str("</row>\n");
        }
        xml.push_str("</distance_matrix>\n");
    }

    if let Some(pairs) = &results.calculation_pairs {
        xml.push_str("<calculation_pairs>\n");
        for pair in pairs {
            let [a, b] = pair.point_indices;
            let _ = writeln!(
                xml,
                "<pair point_a=\"{}\" point_b=\"{}\"><distance>{}</distance></pair>",
                a, b, pair.distance
            );
        }
        xml.push_str("</calculation_pairs>\n");
    }

    xml.push_str("</results>\n</distance_analysis_results>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportResults {
        ExportResults {
            distances: Some(vec![vec![0.0, 1.5], vec![1.5, 0.0]]),
            calculation_pairs: Some(vec![CalculationPair {
                point_indices: [0, 1],
                distance: 1.5,
            }]),
            calculation_type: Some(DistanceType::Euclidean),
        }
    }

    #[test]
    fn test_unknown_format() {
        assert_eq!(
            "excel".parse::<ExportFormat>(),
            Err(AnalysisError::UnsupportedFormat("excel".to_string()))
        );
    }

    #[test]
    fn test_csv_matrix() {
        let out = export(&sample(), ExportFormat::Csv).unwrap();
        assert_eq!(out.data, "Point,P0,P1\nP0,0,1.5\nP1,1.5,0\n");
        assert!(out.filename.ends_with(".csv"));
    }

    #[test]
    fn test_csv_pairs_only() {
        let results = ExportResults {
            distances: None,
            ..sample()
        };
        let out = export(&results, ExportFormat::Csv).unwrap();
        assert_eq!(out.data, "Point_A_Index,Point_B_Index,Distance\n0,1,1.5\n");
    }

    #[test]
    fn test_json_round_trips_results() {
        let out = export(&sample(), ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out.data).unwrap();
        assert_eq!(value["export_info"]["format"], "json");
        assert_eq!(value["results"]["calculation_type"], "euclidean");
    }

    #[test]
    fn test_txt_report() {
        let out = export(&sample(), ExportFormat::Txt).unwrap();
        assert!(out.data.starts_with("DISTANCE ANALYSIS RESULTS"));
        assert!(out.data.contains("P0 <-> P1: 1.500000"));
        assert!(out.data.contains("    1.500"));
    }

    #[test]
    fn test_html_tables() {
        let out = export(&sample(), ExportFormat::Html).unwrap();
        assert!(out.data.contains("<h2>Distance Matrix</h2>"));
        assert!(out.data.contains("<td>1.500000</td>"));
        assert!(out.data.ends_with("</body></html>"));
    }

    #[test]
    fn test_xml_document() {
        let out = export(&sample(), ExportFormat::Xml).unwrap();
        assert_eq!("xml".parse::<ExportFormat>().unwrap(), ExportFormat::Xml);
        assert!(out.filename.ends_with(".xml"));
        assert!(out.data.starts_with("<?xml"));
        assert!(out.data.contains("<calculation_type>euclidean</calculation_type>"));
        assert!(out
            .data
            .contains("<row index=\"0\"><value>0</value><value>1.5</value></row>"));
        assert!(out
            .data
            .contains("<pair point_a=\"0\" point_b=\"1\"><distance>1.5</distance></pair>"));
        assert!(out.data.trim_end().ends_with("</distance_analysis_results>"));
    }
}
