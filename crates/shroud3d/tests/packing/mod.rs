mod merged_uvs;
