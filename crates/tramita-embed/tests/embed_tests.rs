use tramita_core::traits::Embedder;
use tramita_embed::HashEmbedder;

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (norm(a) * norm(b)).max(1e-6)
}

#[tokio::test]
async fn batch_returns_one_vector_per_input_in_order() {
    let embedder = HashEmbedder::new(256);
    let texts = vec![
        "el plazo de presentación".to_string(),
        "ayudas económicas".to_string(),
        "el plazo de presentación".to_string(),
    ];
    let vectors = embedder.embed_batch(&texts).await.expect("embed");
    assert_eq!(vectors.len(), 3);
    for v in &vectors {
        assert_eq!(v.len(), embedder.dim());
    }
    // Same text, same position semantics: items 0 and 2 are identical.
    assert_eq!(vectors[0], vectors[2]);
    assert_ne!(vectors[0], vectors[1]);
}

#[tokio::test]
async fn embedding_is_deterministic_across_calls() {
    let embedder = HashEmbedder::new(256);
    let text = vec!["reconocimiento de discapacidad".to_string()];
    let first = embedder.embed_batch(&text).await.expect("embed");
    let second = embedder.embed_batch(&text).await.expect("embed");
    assert_eq!(first, second);
}

#[tokio::test]
async fn vectors_are_unit_length() {
    let embedder = HashEmbedder::new(256);
    let vectors = embedder
        .embed_batch(&["una frase con varias palabras".to_string()])
        .await
        .expect("embed");
    assert!((norm(&vectors[0]) - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn punctuation_and_case_do_not_change_tokens() {
    let embedder = HashEmbedder::new(256);
    let vectors = embedder
        .embed_batch(&["¿Cuál es el PLAZO?".to_string(), "cuál es el plazo".to_string()])
        .await
        .expect("embed");
    assert_eq!(vectors[0], vectors[1]);
}

#[tokio::test]
async fn shared_vocabulary_scores_higher_than_disjoint() {
    let embedder = HashEmbedder::new(256);
    let vectors = embedder
        .embed_batch(&[
            "el plazo de presentación es de quince días".to_string(),
            "plazo de presentación".to_string(),
            "zanahoria bicicleta violonchelo".to_string(),
        ])
        .await
        .expect("embed");
    let related = cosine_similarity(&vectors[0], &vectors[1]);
    let unrelated = cosine_similarity(&vectors[0], &vectors[2]);
    assert!(related > 0.1, "related texts should overlap: {related}");
    assert!(
        related > unrelated,
        "related ({related}) must beat unrelated ({unrelated})"
    );
}

#[tokio::test]
async fn empty_batch_is_fine() {
    let embedder = HashEmbedder::new(64);
    let vectors = embedder.embed_batch(&[]).await.expect("embed");
    assert!(vectors.is_empty());
}
