/*! Test coverage for the export IR.
 *
 * The renderers trust the IR completely, so the mapping table, the builders and the ordering
 * guarantees are pinned down here rather than rediscovered through generated text.
 */

mod unit_tests;
