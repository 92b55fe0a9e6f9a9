use core::fmt;

use super::ExperimentResult;

impl ExperimentResult {
    /// Writes the ranked candidates in CSV format.
    ///
    /// Columns: `row`, `rank`, `Utility`, `Novelty`, then for every target
    /// its prediction and `Uncertainty (<target>)`, then one column per
    /// a-priori value.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sequential_learning::ExperimentConductor;
    /// use sequential_learning::dataset::Dataset;
    /// use sequential_learning::request::ExperimentRequest;
    ///
    /// let dataset = Dataset::new("mixes")
    ///     .with_column("water", [0.40, 0.45, 0.50, 0.55])
    ///     .unwrap()
    ///     .with_column("Target: strength", [Some(48.0), Some(41.0), None, None])
    ///     .unwrap();
    /// let request = ExperimentRequest::builder()
    ///     .features(["water"])
    ///     .target("Target: strength", 1.0, "max", None)
    ///     .build();
    /// let result = ExperimentConductor::run(&dataset, &request).unwrap();
    ///
    /// let mut buf = Vec::new();
    /// result.to_csv(&mut buf).unwrap();
    /// let csv = String::from_utf8(buf).unwrap();
    /// assert!(csv.starts_with(
    ///     "row,rank,Utility,Novelty,Target: strength,Uncertainty (Target: strength)\n"
    /// ));
    /// assert_eq!(csv.lines().count(), 3);
    /// ```
    pub fn to_csv(&self, mut writer: impl std::io::Write) -> std::io::Result<()> {
        write!(writer, "row,rank,Utility,Novelty")?;
        for target in &self.target_names {
            write!(
                writer,
                ",{},{}",
                csv_escape(target),
                csv_escape(&format!("Uncertainty ({target})"))
            )?;
        }
        for name in &self.apriori_names {
            write!(writer, ",{}", csv_escape(name))?;
        }
        writeln!(writer)?;

        for candidate in &self.rows {
            write!(
                writer,
                "{},{},{},{}",
                candidate.row, candidate.rank, candidate.utility, candidate.novelty
            )?;
            let per_target = candidate.predictions.iter().zip(&candidate.uncertainties);
            for (prediction, uncertainty) in per_target {
                write!(writer, ",{prediction},{uncertainty}")?;
            }
            for value in &candidate.apriori {
                write!(writer, ",{value}")?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    /// Writes the ranked candidates to a CSV file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or written.
    pub fn export_csv(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.to_csv(std::io::BufWriter::new(file))
    }

    /// Returns a short human-readable summary: candidate count and the best
    /// candidate's scores.
    #[must_use]
    pub fn summary(&self) -> String {
        use fmt::Write;

        let mut s = format!("Experiment: {} candidates", self.rows.len());
        if let Some(best) = self.best() {
            let _ = write!(
                s,
                "\nBest: row {} | utility {:.4} | novelty {:.4}",
                best.row, best.utility, best.novelty
            );
            for (target, (p, u)) in self
                .target_names
                .iter()
                .zip(best.predictions.iter().zip(&best.uncertainties))
            {
                let _ = write!(s, "\n  {target} = {p:.4} ± {u:.4}");
            }
        }
        s
    }
}

impl fmt::Display for ExperimentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(feature = "serde")]
impl ExperimentResult {
    /// Serializes the result as pretty-printed JSON.
    ///
    /// The normalized feature table is not included.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Saves the result to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .map_err(std::io::Error::other)
    }

    /// Loads a result previously written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(std::io::Error::other)
    }
}

/// Quotes a CSV cell containing a comma, quote or line break.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
