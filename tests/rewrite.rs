//! End-to-end rewrites through the public API.

use std::fs;

use format_to_as::write::{batch_rewrite_files, BatchWriteResult};
use format_to_as::{rewrite_file, rewrite_source, RewriteConfig, RewriteError, WriteMode};

fn rewrite(source: &str) -> String {
    rewrite_source(source, &RewriteConfig::default())
        .unwrap()
        .output
}

// ─── Scenarios ──────────────────────────────────────────────────

#[test]
fn top_level_format_becomes_as() {
    assert!(rewrite("get :images_path, format: :x\n").contains("get :images_path, as: :x"));
}

#[test]
fn existing_as_is_unchanged() {
    let source = "post :image_path, as: :json\n";
    assert_eq!(rewrite(source), source);
}

#[test]
fn nested_format_moves_to_top_level() {
    assert!(rewrite("post :image_path, params: { id: 1, format: :x }\n")
        .contains("post :image_path, as: :x, params: { id: 1 }"));
}

#[test]
fn format_after_params_is_promoted() {
    assert!(rewrite("post :image_path, params: { id: 1 }, format: :flat\n")
        .contains("post :image_path, as: :flat, params: { id: 1 }"));
}

#[test]
fn rails_four_forms_converge() {
    let expected = "get :images_path, as: :json, params: { limit: 10, sort: 'new' }\n";
    assert_eq!(
        rewrite("get :images_path, format: :json, params: {limit: 10, sort: 'new'}\n"),
        expected
    );
    assert_eq!(
        rewrite("get :images_path, params: {limit: 10, sort: 'new', format: :json}\n"),
        expected
    );
}

// ─── Properties ─────────────────────────────────────────────────

#[test]
fn rewriting_is_idempotent() {
    let sources = [
        "get :index, format: :json\n",
        "post :create, params: { user: { name: 'x' }, format: :js }, xhr: true\n",
        "get :index, params: { id: get(:show, format: :json) }\n",
        "patch(:update, format: :json) do |r|\n  r\nend\n",
    ];
    for source in sources {
        let once = rewrite(source);
        assert_eq!(rewrite(&once), once, "second pass changed {source:?}");
    }
}

#[test]
fn keys_are_sorted() {
    assert_eq!(
        rewrite("get :index, xhr: true, headers: { 'X-Id' => 1 }, format: :js\n"),
        "get :index, as: :js, headers: { 'X-Id' => 1 }, xhr: true\n"
    );
    assert_eq!(
        rewrite("get :index, params: { sort: 'new', limit: 10, format: :json }\n"),
        "get :index, as: :json, params: { limit: 10, sort: 'new' }\n"
    );
}

#[test]
fn unrelated_code_is_byte_identical() {
    let source = "\
require 'test_helper'

class ImagesControllerTest < ActionController::TestCase
  setup do
    @image = images(:one)   # fixture
  end

  test 'show' do
    render   :show,  format:   :json
    get :show, some_path
    get :index
    assert_response :success
  end
end
";
    let result = rewrite_source(source, &RewriteConfig::default()).unwrap();
    assert_eq!(result.output, source);
    assert_eq!(result.stats.rewritten, 0);
}

#[test]
fn only_the_call_text_changes() {
    let source = "\
  test 'index' do
    get   :index,   format: :json   # trailing comment
    assert_response :success
  end
";
    assert_eq!(
        rewrite(source),
        "\
  test 'index' do
    get :index, as: :json   # trailing comment
    assert_response :success
  end
"
    );
}

// ─── Call shapes ────────────────────────────────────────────────

#[test]
fn receiver_and_parentheses_are_kept() {
    assert_eq!(
        rewrite("self.get(:index, format: :json)\n"),
        "self.get(:index, as: :json)\n"
    );
}

#[test]
fn trailing_block_is_kept() {
    let source = "get :index, format: :json do |response|\n  response.ok?\nend\n";
    assert_eq!(
        rewrite(source),
        "get :index, as: :json do |response|\n  response.ok?\nend\n"
    );
}

#[test]
fn nested_calls_are_rewritten() {
    let source = "get :index, params: { id: get(:show, format: :json) }\n";
    let result = rewrite_source(source, &RewriteConfig::default()).unwrap();

    assert_eq!(
        result.output,
        "get :index, params: { id: get(:show, as: :json) }\n"
    );
    assert_eq!(result.stats.rewritten, 2);
}

#[test]
fn escaped_param_keys_leave_the_call_alone() {
    let sources = [
        "get :index, params: { 'it\\'s': 1 }, format: :json\n",
        "get :index, params: { :'a\\'b' => 1 }, format: :json\n",
        "get :index, params: { \"a\\\"b\": 1 }, format: :json\n",
        "get :index, params: { :'x\\\\y' => 1 }, format: :json\n",
    ];
    for source in sources {
        let result = rewrite_source(source, &RewriteConfig::default()).unwrap();
        assert_eq!(result.output, source, "key text changed in {source:?}");
        assert_eq!(result.stats.skipped, 1);
    }
}

#[test]
fn escaped_keys_in_pass_through_values_are_kept() {
    assert_eq!(
        rewrite("get :x, headers: { 'a\\'b': 1, :'c\\\\d' => 2 }, format: :json\n"),
        "get :x, as: :json, headers: { 'a\\'b': 1, :'c\\\\d' => 2 }\n"
    );
}

#[test]
fn quoted_param_keys_keep_their_value() {
    assert_eq!(
        rewrite("get :index, params: { 'content-type': 1, \"x y\": 2, :'a-b' => 3, format: :json }\n"),
        "get :index, as: :json, params: { \"a-b\": 3, \"content-type\": 1, \"x y\": 2 }\n"
    );
}

#[test]
fn string_format_key_is_data() {
    assert_eq!(
        rewrite("get :index, 'format' => 'csv'\n"),
        "get :index, 'format' => 'csv'\n"
    );
}

#[test]
fn multibyte_text_survives() {
    assert_eq!(
        rewrite("get :index, params: { name: 'héllo' }, format: :json # ✓\n"),
        "get :index, as: :json, params: { name: 'héllo' } # ✓\n"
    );
}

#[test]
fn commented_calls_are_left_alone() {
    let source = "get :index,\n  # why\n  format: :json\n";
    assert_eq!(rewrite(source), source);
}

// ─── Failures ───────────────────────────────────────────────────

#[test]
fn validation_failure_only_affects_its_call() {
    let source = "get :index, format: :json, **opts\npost :create, format: :js\n";
    let result = rewrite_source(source, &RewriteConfig::default()).unwrap();

    assert_eq!(
        result.output,
        "get :index, format: :json, **opts\npost :create, as: :js\n"
    );
    assert_eq!(result.stats.failed, 1);
    assert_eq!(result.failures.len(), 1);
    assert_eq!((result.failures[0].line, result.failures[0].column), (1, 1));
}

#[test]
fn syntax_errors_are_refused() {
    let err = rewrite_source("get :index, format: :json)\n", &RewriteConfig::default()).unwrap_err();
    assert!(matches!(err, RewriteError::Syntax { line: 1, .. }));
}

// ─── Files ──────────────────────────────────────────────────────

#[test]
fn files_are_rewritten_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("images_controller_test.rb");
    let second = dir.path().join("users_controller_test.rb");
    fs::write(&first, "get :index, format: :json\n").unwrap();
    fs::write(&second, "get :index, as: :json\n").unwrap();

    let results = batch_rewrite_files(
        &[first.clone(), second.clone()],
        &RewriteConfig::default(),
        WriteMode::InPlace,
    );
    let summary = BatchWriteResult::from_results(results);

    assert_eq!(summary.changed, 1);
    assert_eq!(fs::read_to_string(&first).unwrap(), "get :index, as: :json\n");
    assert_eq!(fs::read_to_string(&second).unwrap(), "get :index, as: :json\n");

    let again = rewrite_file(&first, &RewriteConfig::default(), WriteMode::DryRun).unwrap();
    assert!(!again.changed);
}

#[test]
fn config_file_controls_methods() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(".format-to-as.toml");
    fs::write(&config_path, "[rule]\nmethods = [\"update\"]\n").unwrap();
    let config = RewriteConfig::load(&config_path).unwrap();

    let output = rewrite_source("update :x, format: :js\nget :y, format: :js\n", &config)
        .unwrap()
        .output;
    assert_eq!(output, "update :x, as: :js\nget :y, format: :js\n");
}
