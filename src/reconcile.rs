use crate::record::TimeSlotEntry;

/// 新規送信された枠と保存済みの枠を統合する。
///
/// 結果は新規枠のコピーから始まり、同じ時刻キーを持つ新規枠が存在しない
/// 保存済み枠だけをそのまま末尾に加える。同じキーでは常に新規側が勝ち、
/// 新規送信が触れていない枠は保持される。ユーザーが変更した枠だけを
/// 送信しても、残りの枠はそのまま残る。
///
/// キーの比較は正規化した時刻キーで行い、正規化できない表現同士は
/// 文字列として比較する。空の入力も有効で、もう一方の枠がそのまま返る。
///
/// # Arguments
/// * `new_slots` - 新規に送信された枠一覧
/// * `existing_slots` - 保存済みの枠一覧
pub fn reconcile(
    new_slots: &[TimeSlotEntry],
    existing_slots: &[TimeSlotEntry],
) -> Vec<TimeSlotEntry> {
    let mut merged = new_slots.to_vec();

    for existing in existing_slots {
        let occupied = match existing.slot_key() {
            Some(key) => new_slots.iter().any(|entry| entry.slot_key() == Some(key)),
            None => new_slots.iter().any(|entry| entry.time == existing.time),
        };
        if !occupied {
            merged.push(existing.clone());
        }
    }

    merged
}
