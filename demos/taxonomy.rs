use hierscore::{multi_labeled, Hierarchy, MultiLabeled, ScoreConfig, ZeroDivision, ROOT};
use hierscore::{h_fbeta_score, h_precision_score, h_recall_score};
use tracing_subscriber::EnvFilter;

fn main() -> hierscore::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 1. A small product taxonomy, root marked with the sentinel.
    let graph = Hierarchy::from_sentinel_edges(
        vec![
            (ROOT, "electronics"),
            ("electronics", "phone"),
            ("electronics", "laptop"),
            ("phone", "smartphone"),
            (ROOT, "clothing"),
            ("clothing", "shoes"),
            ("clothing", "jacket"),
        ],
        &ROOT,
    )?;

    // 2. Ground truth and predictions as label sets per sample.
    let y_true = vec![
        vec!["smartphone"],
        vec!["laptop"],
        vec!["shoes", "jacket"],
    ];
    let y_pred = vec![
        vec!["phone"],      // right branch, too coarse
        vec!["smartphone"], // sibling branch
        vec!["shoes"],      // one of two
    ];

    // 3. Scoped evaluation: binarized artifacts only live inside the closure.
    let (hp, hr, hf) = multi_labeled(&y_true, &y_pred, &graph, |t, p, g| {
        Ok((
            h_precision_score(t, p, g)?,
            h_recall_score(t, p, g)?,
            h_fbeta_score(t, p, g, 1.0)?,
        ))
    })?;
    println!("hP = {hp:.3}, hR = {hr:.3}, hF1 = {hf:.3}");

    // 4. Or keep the artifacts around and get a full report.
    let labeled = MultiLabeled::new(&y_true, &y_pred, &graph)?;
    println!("classes: {:?}", labeled.space.classes());
    let config = ScoreConfig::new()
        .with_beta(2.0)
        .with_zero_division(ZeroDivision::Value(0.0));
    println!("{}", labeled.scores(&config)?);

    Ok(())
}
